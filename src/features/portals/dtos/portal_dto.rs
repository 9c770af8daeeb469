use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::moderation::models::{CommentDto, ModerationStatus};
use crate::features::offices::models::Office;
use crate::features::portals::models::Portal;
use crate::shared::constants::{DEFAULT_PORTAL_ICON, MAX_PORTAL_TITLE_LEN};
use crate::shared::validation::{trimmed, trimmed_opt, PORTAL_URL_REGEX};

/// Request DTO for creating a portal shortcut
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePortalDto {
    #[validate(length(
        min = 1,
        max = MAX_PORTAL_TITLE_LEN,
        message = "Title is required and can not be more than 50 characters"
    ))]
    #[serde(deserialize_with = "trimmed")]
    pub title: String,

    #[validate(regex(path = *PORTAL_URL_REGEX, message = "Please add a valid URL"))]
    #[serde(deserialize_with = "trimmed")]
    pub url: String,

    /// Defaults to 🔗
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub icon: Option<String>,

    pub office: Office,
}

impl CreatePortalDto {
    pub fn icon_or_default(&self) -> String {
        self.icon
            .as_deref()
            .map(str::trim)
            .filter(|icon| !icon.is_empty())
            .unwrap_or(DEFAULT_PORTAL_ICON)
            .to_string()
    }
}

/// Request DTO for editing a portal; sends it back to review
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePortalDto {
    #[validate(length(
        min = 1,
        max = MAX_PORTAL_TITLE_LEN,
        message = "Title is required and can not be more than 50 characters"
    ))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub title: Option<String>,

    #[validate(regex(path = *PORTAL_URL_REGEX, message = "Please add a valid URL"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    pub icon: Option<String>,

    pub office: Option<Office>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PortalResponseDto {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub office: Office,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub pinned: bool,
    pub status: ModerationStatus,
    pub comments: Vec<CommentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PortalResponseDto {
    pub fn new(portal: Portal, comments: Vec<CommentDto>) -> Self {
        Self {
            id: portal.id,
            title: portal.title,
            url: portal.url,
            icon: portal.icon,
            office: portal.office,
            author_id: portal.author_id,
            author_name: portal.author_name,
            pinned: portal.pinned,
            status: portal.status,
            comments,
            created_at: portal.created_at,
            updated_at: portal.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(title: &str, icon: Option<&str>) -> CreatePortalDto {
        CreatePortalDto {
            title: title.to_string(),
            url: "https://erp.example.edu".to_string(),
            icon: icon.map(str::to_string),
            office: Office::AccountsOffice,
        }
    }

    #[test]
    fn test_title_longer_than_fifty_characters_is_invalid() {
        assert!(create_dto(&"a".repeat(50), None).validate().is_ok());
        assert!(create_dto(&"a".repeat(51), None).validate().is_err());
    }

    #[test]
    fn test_title_is_trimmed_before_length_checks() {
        let dto: UpdatePortalDto = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(dto.validate().is_err());

        let padded = format!(r#"{{"title": "  {}  "}}"#, "a".repeat(50));
        let dto: UpdatePortalDto = serde_json::from_str(&padded).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.title.map(|t| t.len()), Some(50));
    }

    #[test]
    fn test_icon_defaults_to_link_symbol() {
        assert_eq!(create_dto("ERP", None).icon_or_default(), "🔗");
        assert_eq!(create_dto("ERP", Some("  ")).icon_or_default(), "🔗");
        assert_eq!(create_dto("ERP", Some("📚")).icon_or_default(), "📚");
    }
}
