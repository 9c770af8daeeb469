mod quick_link_dto;

pub use quick_link_dto::{CreateQuickLinkDto, QuickLinkResponseDto, UpdateQuickLinkDto};
