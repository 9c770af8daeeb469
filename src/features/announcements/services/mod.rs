mod announcement_service;

pub use announcement_service::{
    AnnouncementCache, AnnouncementChanges, AnnouncementService, NewAnnouncement,
};
