use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::policy::Resource;
use crate::features::moderation::models::ModerationStatus;
use crate::features::offices::models::Office;

/// Directory of the stock background images, one per office
pub const ANNOUNCEMENT_BACKGROUND_DIR: &str = "/uploads/announcements_bg";

#[derive(Debug, Clone, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub office: Office,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub image: String,
    pub link: String,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    pub fn resource(&self) -> Resource {
        Resource::new(self.office, self.status)
    }

    /// Stock background used when no image was uploaded
    pub fn default_image(office: Office) -> String {
        format!("{}/{}.jpg", ANNOUNCEMENT_BACKGROUND_DIR, office)
    }

    /// Whether the image was uploaded with the announcement
    pub fn has_uploaded_image(&self) -> bool {
        !self
            .image
            .starts_with(&format!("{}/", ANNOUNCEMENT_BACKGROUND_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announcement(image: String) -> Announcement {
        Announcement {
            id: Uuid::now_v7(),
            title: "Library closed on Friday".to_string(),
            office: Office::LibraryOffice,
            author_id: None,
            author_name: None,
            image,
            link: "https://youtube.com".to_string(),
            status: ModerationStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_default_image_uses_office_name() {
        assert_eq!(
            Announcement::default_image(Office::LibraryOffice),
            "/uploads/announcements_bg/Library Office.jpg"
        );
    }

    #[test]
    fn test_stock_background_is_not_an_upload() {
        assert!(!announcement(Announcement::default_image(Office::LibraryOffice)).has_uploaded_image());
        assert!(announcement("/uploads/announcements/1712345678901-poster.png".to_string())
            .has_uploaded_image());
    }
}
