mod quick_link;

pub use quick_link::QuickLink;
