use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::AuthResponseDto;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::JwtValidator;
use crate::features::users::UserService;

/// Service for sessions: login, token validation and the session cookie
pub struct AuthService {
    users: Arc<UserService>,
    validator: Arc<JwtValidator>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, validator: Arc<JwtValidator>, config: AuthConfig) -> Self {
        Self {
            users,
            validator,
            config,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// Issue a token for an existing account
    pub async fn login(&self, email: &str) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        let issued = self.validator.issue(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponseDto {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: user.into(),
        })
    }

    /// Resolve a token to the current state of its user
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.validator.validate_token(token)?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(user.into())
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure)
            .path("/")
            .max_age(time::Duration::days(self.config.cookie_expire_days))
            .build()
    }

    /// Expired cookie overwriting the session, sent whether or not the request carried one
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.cookie_secure)
            .path("/")
            .max_age(time::Duration::ZERO)
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::lazy_pool;
    use std::time::Duration;

    fn service() -> AuthService {
        let config = AuthConfig {
            jwt_secret: "secret".to_string(),
            jwt_expire: Duration::from_secs(3600),
            cookie_expire_days: 30,
            cookie_name: "token".to_string(),
            cookie_secure: true,
        };
        AuthService::new(
            Arc::new(UserService::new(lazy_pool())),
            Arc::new(JwtValidator::new(&config.jwt_secret, config.jwt_expire)),
            config,
        )
    }

    #[tokio::test]
    async fn test_session_cookie_attributes() {
        let cookie = service().session_cookie("abc".to_string());

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(30)));
    }

    #[tokio::test]
    async fn test_removal_cookie_is_expired() {
        let cookie = service().removal_cookie();

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(
            cookie.expires_datetime(),
            Some(time::OffsetDateTime::UNIX_EPOCH)
        );
    }

    #[tokio::test]
    async fn test_authenticate_rejects_invalid_token_before_lookup() {
        let result = service().authenticate("garbage").await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
