mod portal_dto;

pub use portal_dto::{CreatePortalDto, PortalResponseDto, UpdatePortalDto};
