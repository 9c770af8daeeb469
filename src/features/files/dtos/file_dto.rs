use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::{File, FileVersion};
use crate::features::moderation::models::{CommentDto, ModerationStatus};
use crate::features::offices::models::Office;
use crate::shared::validation::{trimmed, trimmed_opt};

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload; either this or `url` is required
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
    /// External link used instead of an uploaded file
    pub url: Option<String>,
    #[schema(example = "Fee Notice")]
    pub name: String,
    #[schema(example = "Accounts Office")]
    pub office: String,
    #[schema(example = "Notices")]
    pub category: String,
}

/// New version request DTO for OpenAPI documentation
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct AddVersionDto {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Option<String>,
    pub url: Option<String>,
    /// Defaults to the current name
    pub name: Option<String>,
}

/// Request DTO for editing file metadata
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFileDto {
    #[validate(length(min = 2, message = "File name must be at least 2 characters long"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Category is required"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub category: Option<String>,
}

/// Request DTO for registering an office category
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCategoryDto {
    pub office: Office,

    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileVersionDto {
    pub id: Uuid,
    pub name: String,
    pub url: Option<String>,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FileVersion> for FileVersionDto {
    fn from(v: FileVersion) -> Self {
        Self {
            id: v.id,
            name: v.name,
            url: v.url,
            file_path: v.file_path,
            created_at: v.created_at,
        }
    }
}

/// Response DTO for file
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    pub name: String,
    pub office: Office,
    pub category: String,
    pub status: ModerationStatus,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub url: Option<String>,
    pub file_path: Option<String>,
    /// Oldest first
    pub versions: Vec<FileVersionDto>,
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileResponseDto {
    pub fn new(file: File, versions: Vec<FileVersion>, comments: Vec<CommentDto>) -> Self {
        Self {
            id: file.id,
            name: file.name,
            office: file.office,
            category: file.category,
            status: file.status,
            author_id: file.author_id,
            author_name: file.author_name,
            url: file.url,
            file_path: file.file_path,
            versions: versions.into_iter().map(FileVersionDto::from).collect(),
            comments,
            created_at: file.created_at,
            updated_at: file.updated_at,
        }
    }
}

/// Category listing for an office
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeCategoriesDto {
    pub office: Office,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_name_is_measured_after_trimming() {
        let dto: UpdateFileDto = serde_json::from_str(r#"{"name": "  x  "}"#).unwrap();
        assert_eq!(dto.name.as_deref(), Some("x"));
        assert!(dto.validate().is_err());

        let dto: UpdateFileDto = serde_json::from_str(r#"{"name": "  Fee Notice "}"#).unwrap();
        assert_eq!(dto.name.as_deref(), Some("Fee Notice"));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_category_is_invalid() {
        let dto: UpdateFileDto = serde_json::from_str(r#"{"category": "   "}"#).unwrap();
        assert!(dto.validate().is_err());

        let dto: AddCategoryDto =
            serde_json::from_str(r#"{"office": "Accounts Office", "category": "   "}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_fields_are_optional() {
        let dto: UpdateFileDto = serde_json::from_str("{}").unwrap();
        assert!(dto.name.is_none());
        assert!(dto.category.is_none());
        assert!(dto.validate().is_ok());
    }
}
