use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::announcements::models::Announcement;
use crate::features::moderation::models::{CommentDto, ModerationStatus};
use crate::features::offices::models::Office;
use crate::shared::constants::ANNOUNCEMENT_IMAGE_EXTENSIONS;
use crate::shared::multipart::UploadedFile;

/// Multipart body for creating an announcement (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateAnnouncementDto {
    pub title: String,
    #[schema(example = "Library Office")]
    pub office: String,
    /// Defaults to https://youtube.com
    pub link: Option<String>,
    /// jpg, jpeg, png or gif, up to 10 MiB
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// Multipart body for editing an announcement (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UpdateAnnouncementDto {
    pub title: Option<String>,
    pub office: Option<String>,
    pub link: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnnouncementResponseDto {
    pub id: Uuid,
    pub title: String,
    pub office: Office,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub image: String,
    pub link: String,
    pub status: ModerationStatus,
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnnouncementResponseDto {
    pub fn new(announcement: Announcement, comments: Vec<CommentDto>) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title,
            office: announcement.office,
            author_id: announcement.author_id,
            author_name: announcement.author_name,
            image: announcement.image,
            link: announcement.link,
            status: announcement.status,
            comments,
            created_at: announcement.created_at,
            updated_at: announcement.updated_at,
        }
    }
}

/// Refuse anything but the accepted image formats
pub fn check_image(image: &UploadedFile) -> Result<()> {
    match image.extension() {
        Some(ext) if ANNOUNCEMENT_IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(AppError::BadRequest(
            "Only image files are allowed!".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_image_extensions() {
        assert!(check_image(&upload("poster.JPG")).is_ok());
        assert!(check_image(&upload("banner.gif")).is_ok());
        assert!(check_image(&upload("notice.pdf")).is_err());
        assert!(check_image(&upload("noextension")).is_err());
    }
}
