use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::shared::constants::REJECTION_COMMENT_REQUIRED;

/// Moderation lifecycle shared by files, announcements, quick links and portals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "moderation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Reviewer decision applied through the approve/reject endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject { comment: String },
}

impl ModerationAction {
    /// Build a rejection, refusing blank comments
    pub fn reject(comment: Option<&str>) -> Result<Self> {
        match comment.map(str::trim) {
            Some(text) if !text.is_empty() => Ok(ModerationAction::Reject {
                comment: text.to_string(),
            }),
            _ => Err(AppError::BadRequest(REJECTION_COMMENT_REQUIRED.to_string())),
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            ModerationAction::Approve => None,
            ModerationAction::Reject { comment } => Some(comment),
        }
    }
}

impl ModerationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ModerationStatus::Pending)
    }

    /// Next status after a reviewer decision. Only pending content can be reviewed.
    pub fn transition(self, action: &ModerationAction) -> Result<ModerationStatus> {
        if self.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Content is already {} and must be resubmitted before review",
                self
            )));
        }

        Ok(match action {
            ModerationAction::Approve => ModerationStatus::Approved,
            ModerationAction::Reject { .. } => ModerationStatus::Rejected,
        })
    }

    /// Status after the content changed and needs another review
    pub fn reopen(self) -> ModerationStatus {
        ModerationStatus::Pending
    }
}

/// Content type owning a moderation comment, matching the `moderation_entity` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "moderation_entity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModerationEntity {
    File,
    Announcement,
    QuickLink,
    Portal,
}

impl ModerationEntity {
    /// Table backing the entity (fixed set, safe to interpolate)
    pub fn table(&self) -> &'static str {
        match self {
            ModerationEntity::File => "files",
            ModerationEntity::Announcement => "announcements",
            ModerationEntity::QuickLink => "quick_links",
            ModerationEntity::Portal => "portals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModerationEntity::File => "File",
            ModerationEntity::Announcement => "Announcement",
            ModerationEntity::QuickLink => "Quick link",
            ModerationEntity::Portal => "Portal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_content_starts_pending() {
        assert_eq!(ModerationStatus::default(), ModerationStatus::Pending);
    }

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        let approved = ModerationStatus::Pending
            .transition(&ModerationAction::Approve)
            .unwrap();
        assert_eq!(approved, ModerationStatus::Approved);

        let reject = ModerationAction::reject(Some("Wrong office")).unwrap();
        let rejected = ModerationStatus::Pending.transition(&reject).unwrap();
        assert_eq!(rejected, ModerationStatus::Rejected);
    }

    #[test]
    fn test_terminal_states_refuse_review() {
        for status in [ModerationStatus::Approved, ModerationStatus::Rejected] {
            let err = status.transition(&ModerationAction::Approve).unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }
    }

    #[test]
    fn test_rejection_requires_comment() {
        for comment in [None, Some(""), Some("   ")] {
            match ModerationAction::reject(comment) {
                Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Rejection comment required"),
                other => panic!("expected BadRequest, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejection_comment_is_trimmed() {
        let action = ModerationAction::reject(Some("  Outdated fee table \n")).unwrap();
        assert_eq!(action.comment(), Some("Outdated fee table"));
    }

    #[test]
    fn test_reopen_returns_to_pending() {
        assert_eq!(ModerationStatus::Approved.reopen(), ModerationStatus::Pending);
        assert_eq!(ModerationStatus::Rejected.reopen(), ModerationStatus::Pending);
    }
}
