use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::offices::models::Office;
use crate::features::users::models::{User, UserRole};
use crate::shared::validation::{trimmed, trimmed_opt, EMAIL_REGEX};

/// Request DTO for self registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserDto {
    #[validate(regex(path = *EMAIL_REGEX, message = "Please add a valid email"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,

    /// Derived from the email when omitted
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,

    pub office: Option<Office>,
}

/// Request DTO for creating a user as superadmin
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(regex(path = *EMAIL_REGEX, message = "Please add a valid email"))]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    pub office: Option<Office>,
}

impl From<RegisterUserDto> for CreateUserDto {
    fn from(dto: RegisterUserDto) -> Self {
        Self {
            email: dto.email,
            name: dto.name,
            role: UserRole::User,
            office: dto.office,
        }
    }
}

/// Request DTO for updating a user
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,

    pub role: Option<UserRole>,

    pub office: Option<Office>,
}

/// Request DTO for changing a role; kept as a string so unknown roles get a 400
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRoleDto {
    pub role: String,
}

/// Response DTO for user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponseDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub office: Option<Office>,
    pub profile_pic: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            office: u.office,
            profile_pic: u.profile_pic,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_dto_rejects_bad_email() {
        let dto = RegisterUserDto {
            email: "not-an-email".to_string(),
            name: None,
            office: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_forces_user_role() {
        let dto = RegisterUserDto {
            email: "clerk@example.edu".to_string(),
            name: None,
            office: Some(Office::AccountsOffice),
        };
        assert!(dto.validate().is_ok());

        let create: CreateUserDto = dto.into();
        assert_eq!(create.role, UserRole::User);
        assert_eq!(create.office, Some(Office::AccountsOffice));
    }

    #[test]
    fn test_create_dto_role_defaults_to_user() {
        let dto: CreateUserDto =
            serde_json::from_str(r#"{"email":"a.b@example.edu"}"#).unwrap();
        assert_eq!(dto.role, UserRole::User);
    }
}
