use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::moderation::models::ModerationAction;

/// Request body for rejecting an entity
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RejectRequestDto {
    /// Reason shown to the author; required
    pub comment: Option<String>,
}

impl RejectRequestDto {
    /// Parse a possibly empty JSON body into a reject action.
    ///
    /// An empty body counts as a missing comment rather than malformed JSON.
    pub fn parse_action(body: &[u8]) -> Result<ModerationAction> {
        let dto = if body.iter().all(u8::is_ascii_whitespace) {
            RejectRequestDto::default()
        } else {
            serde_json::from_slice::<RejectRequestDto>(body)
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON data: {}", e)))?
        };

        ModerationAction::reject(dto.comment.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::REJECTION_COMMENT_REQUIRED;

    fn rejection_message(body: &[u8]) -> String {
        match RejectRequestDto::parse_action(body) {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_comment_is_rejected() {
        assert_eq!(rejection_message(b""), REJECTION_COMMENT_REQUIRED);
        assert_eq!(rejection_message(b"{}"), REJECTION_COMMENT_REQUIRED);
        assert_eq!(
            rejection_message(br#"{"comment": "   "}"#),
            REJECTION_COMMENT_REQUIRED
        );
    }

    #[test]
    fn test_comment_is_kept_trimmed() {
        let action = RejectRequestDto::parse_action(br#"{"comment": " Wrong office "}"#).unwrap();
        assert_eq!(action.comment(), Some("Wrong office"));
    }

    #[test]
    fn test_malformed_json_is_bad_request() {
        assert!(rejection_message(b"{comment").starts_with("Invalid JSON data"));
    }
}
