mod file_service;

pub use file_service::{Download, FileService, NewFile};
