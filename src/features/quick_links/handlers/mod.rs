mod quick_link_handler;

pub use quick_link_handler::*;
