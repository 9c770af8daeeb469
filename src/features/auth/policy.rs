//! Role and office based authorization for every content type.
//!
//! Handlers describe the target as a [`Resource`] and ask [`authorize`]
//! whether the caller may perform an [`Action`] on it. Rules:
//!
//! - superadmin: everything.
//! - admin: create, update, delete and pin only inside their own office;
//!   read anything in their own office and approved content elsewhere;
//!   never moderate or manage users.
//! - user: read approved content.
//! - anonymous: read approved content, anything else needs a login.

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::moderation::models::ModerationStatus;
use crate::features::offices::models::Office;
use crate::features::users::models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Pin,
    Moderate,
    ManageUsers,
}

impl Action {
    fn is_mutation(self) -> bool {
        matches!(
            self,
            Action::Create | Action::Update | Action::Delete | Action::Pin
        )
    }
}

/// What is being acted on: its owning office and moderation status, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resource {
    pub office: Option<Office>,
    pub status: Option<ModerationStatus>,
}

impl Resource {
    pub fn new(office: Office, status: ModerationStatus) -> Self {
        Self {
            office: Some(office),
            status: Some(status),
        }
    }

    /// Unmoderated content (FAQs, categories) or a not yet created entity
    pub fn in_office(office: Office) -> Self {
        Self {
            office: Some(office),
            status: None,
        }
    }

    /// Not scoped to any office, e.g. the user directory
    pub fn global() -> Self {
        Self::default()
    }

    fn is_public(&self) -> bool {
        matches!(self.status, None | Some(ModerationStatus::Approved))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(&'static str),
    Unauthenticated,
}

impl Decision {
    #[cfg(test)]
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

pub fn evaluate(
    actor: Option<&AuthenticatedUser>,
    action: Action,
    resource: &Resource,
) -> Decision {
    let Some(actor) = actor else {
        return if action == Action::Read && resource.is_public() {
            Decision::Allow
        } else {
            Decision::Unauthenticated
        };
    };

    match actor.role {
        UserRole::Superadmin => Decision::Allow,
        UserRole::Admin => {
            let own_office = resource.office.is_some_and(|office| actor.belongs_to(office));
            match action {
                Action::Read if own_office || resource.is_public() => Decision::Allow,
                Action::Read => Decision::Deny("Not authorized to view this resource"),
                Action::Moderate => Decision::Deny("Superadmin access required"),
                Action::ManageUsers => Decision::Deny("Superadmin access required"),
                _ if own_office => Decision::Allow,
                _ => Decision::Deny("Not authorized to manage content of another office"),
            }
        }
        UserRole::User => {
            if action == Action::Read && resource.is_public() {
                Decision::Allow
            } else if action.is_mutation() {
                Decision::Deny("Admin access required")
            } else {
                Decision::Deny("Not authorized to access this resource")
            }
        }
    }
}

/// [`evaluate`] as a `Result`: deny is 403, missing login is 401
pub fn authorize(
    actor: Option<&AuthenticatedUser>,
    action: Action,
    resource: &Resource,
) -> Result<()> {
    match evaluate(actor, action, resource) {
        Decision::Allow => Ok(()),
        Decision::Deny(reason) => {
            tracing::warn!(
                user_id = ?actor.map(|a| a.id),
                ?action,
                office = ?resource.office,
                "Access denied: {}",
                reason
            );
            Err(AppError::Forbidden(reason.to_string()))
        }
        Decision::Unauthenticated => Err(AppError::Unauthorized("Not authorized".to_string())),
    }
}
