mod announcement_dto;

pub use announcement_dto::{
    check_image, AnnouncementResponseDto, CreateAnnouncementDto, UpdateAnnouncementDto,
};
