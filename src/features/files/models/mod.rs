mod file;

pub use file::{File, FileSource, FileVersion};
