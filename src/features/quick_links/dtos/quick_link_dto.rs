use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::moderation::models::{CommentDto, ModerationStatus};
use crate::features::offices::models::Office;
use crate::features::quick_links::models::QuickLink;
use crate::shared::validation::{trimmed, trimmed_opt, PORTAL_URL_REGEX};

/// Request DTO for creating a quick link
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuickLinkDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    #[serde(deserialize_with = "trimmed")]
    pub title: String,

    #[validate(regex(path = *PORTAL_URL_REGEX, message = "Please add a valid URL"))]
    #[serde(deserialize_with = "trimmed")]
    pub url: String,

    pub office: Office,

    /// Defaults to pinned
    pub pinned: Option<bool>,
}

/// Request DTO for editing a quick link; sends it back to review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuickLinkDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub title: Option<String>,

    #[validate(regex(path = *PORTAL_URL_REGEX, message = "Please add a valid URL"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub url: Option<String>,

    pub office: Option<Office>,
}

/// Response DTO for quick link
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuickLinkResponseDto {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub office: Office,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub pinned: bool,
    pub status: ModerationStatus,
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuickLinkResponseDto {
    pub fn new(link: QuickLink, comments: Vec<CommentDto>) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            office: link.office,
            author_id: link.author_id,
            author_name: link.author_name,
            pinned: link.pinned,
            status: link.status,
            comments,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_validates_url() {
        let dto: CreateQuickLinkDto = serde_json::from_str(
            r#"{"title": "ERP", "url": "erp.example.edu", "office": "General Administration"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateQuickLinkDto = serde_json::from_str(
            r#"{"title": "ERP", "url": "https://erp.example.edu", "office": "General Administration"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.pinned, None);
    }

    #[test]
    fn test_blank_title_is_invalid() {
        let dto: CreateQuickLinkDto = serde_json::from_str(
            r#"{"title": "   ", "url": "https://erp.example.edu", "office": "General Administration"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_err());

        let dto: UpdateQuickLinkDto = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_padded_values_are_trimmed() {
        let dto: CreateQuickLinkDto = serde_json::from_str(
            r#"{"title": "  ERP ", "url": " https://erp.example.edu ", "office": "General Administration"}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.title, "ERP");
        assert_eq!(dto.url, "https://erp.example.edu");
    }

    #[test]
    fn test_update_dto_fields_are_optional() {
        let dto: UpdateQuickLinkDto = serde_json::from_str("{}").unwrap();
        assert!(dto.validate().is_ok());
    }
}
