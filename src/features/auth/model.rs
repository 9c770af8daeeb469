use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::offices::models::Office;
use crate::features::users::models::{User, UserRole};

/// The caller of a protected route, loaded fresh from the users table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub office: Option<Office>,
}

impl AuthenticatedUser {
    /// Check if user is super admin
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::Superadmin
    }

    /// Check if user has admin-level access (admin or superadmin)
    pub fn has_admin_access(&self) -> bool {
        self.role >= UserRole::Admin
    }

    /// True when the user belongs to the given office
    pub fn belongs_to(&self, office: Office) -> bool {
        self.office == Some(office)
    }
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            office: user.office,
        }
    }
}

/// JWT claims issued by this service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}
