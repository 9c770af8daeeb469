mod office_handler;

pub use office_handler::*;
