use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::faqs::models::Faq;
use crate::features::offices::models::Office;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFaqDto {
    #[validate(length(min = 1, message = "Please add a question"))]
    #[schema(example = "When is the hostel fee due?")]
    pub question: String,

    #[validate(length(min = 1, message = "Please add an answer"))]
    pub answer: String,

    pub office: Office,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFaqDto {
    #[validate(length(min = 1, message = "Please add a question"))]
    pub question: Option<String>,

    #[validate(length(min = 1, message = "Please add an answer"))]
    pub answer: Option<String>,

    /// Moving a FAQ needs rights on both offices
    pub office: Option<Office>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SimilarQuery {
    pub question: Option<String>,
    /// Office name, e.g. `Hostel Office`
    pub office: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FaqResponseDto {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub office: Office,
    pub keywords: Vec<String>,
    pub update_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl From<Faq> for FaqResponseDto {
    fn from(faq: Faq) -> Self {
        Self {
            id: faq.id,
            question: faq.question,
            answer: faq.answer,
            office: faq.office,
            keywords: faq.keywords,
            update_count: faq.update_count,
            created_at: faq.created_at,
            last_updated: faq.last_updated,
        }
    }
}

/// A FAQ with its relevance score
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoredFaqDto {
    #[serde(flatten)]
    pub faq: FaqResponseDto,
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_faq_is_flat() {
        let scored = ScoredFaqDto {
            faq: FaqResponseDto {
                id: Uuid::now_v7(),
                question: "When is the hostel fee due?".to_string(),
                answer: "By the 10th".to_string(),
                office: Office::HostelOffice,
                keywords: vec!["when".to_string(), "hostel".to_string()],
                update_count: 0,
                created_at: Utc::now(),
                last_updated: Utc::now(),
            },
            score: 7,
        };

        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["score"], 7);
        assert_eq!(json["office"], "Hostel Office");
        assert_eq!(json["question"], "When is the hostel fee due?");
    }

    #[test]
    fn test_blank_answer_is_invalid() {
        let dto = CreateFaqDto {
            question: "When is the hostel fee due?".to_string(),
            answer: String::new(),
            office: Office::HostelOffice,
        };
        assert!(dto.validate().is_err());
    }
}
