use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::policy::Resource;
use crate::features::moderation::models::ModerationStatus;
use crate::features::offices::models::Office;

#[derive(Debug, Clone, FromRow)]
pub struct Portal {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub icon: String,
    pub office: Office,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub pinned: bool,
    pub status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Portal {
    pub fn resource(&self) -> Resource {
        Resource::new(self.office, self.status)
    }
}
