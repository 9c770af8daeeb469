use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::offices::models::Office;

#[derive(Debug, Clone, FromRow)]
pub struct Faq {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub office: Office,
    /// Derived from the question on every save
    pub keywords: Vec<String>,
    pub update_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
