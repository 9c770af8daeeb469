mod quick_link_service;

pub use quick_link_service::QuickLinkService;
