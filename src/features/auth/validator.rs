use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;

use super::model::Claims;
use crate::core::error::AppError;
use crate::features::users::models::User;

/// Signed token handed to the client after login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: i64,
}

/// Issues and validates HS256 tokens signed with `JWT_SECRET`
pub struct JwtValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expire: Duration,
}

impl JwtValidator {
    pub fn new(secret: &str, expire: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expire,
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken, AppError> {
        let now = Utc::now().timestamp();
        let expires_in = self.expire.as_secs() as i64;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + expires_in,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, expires_in })
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejected: {}", e);
                AppError::Unauthorized("Not authorized".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::now_v7(),
            email: "jane.roe@example.edu".to_string(),
            role: UserRole::Admin,
            office: None,
            name: "Jane Roe".to_string(),
            profile_pic: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_validate() {
        let validator = JwtValidator::new("test-secret", Duration::from_secs(3600));
        let user = sample_user();

        let issued = validator.issue(&user).unwrap();
        assert_eq!(issued.expires_in, 3600);

        let claims = validator.validate_token(&issued.token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtValidator::new("secret-a", Duration::from_secs(3600));
        let verifier = JwtValidator::new("secret-b", Duration::from_secs(3600));

        let issued = issuer.issue(&sample_user()).unwrap();
        assert!(matches!(
            verifier.validate_token(&issued.token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let validator = JwtValidator::new("test-secret", Duration::from_secs(3600));
        let user = sample_user();
        let claims = Claims {
            sub: user.id,
            email: user.email,
            role: user.role,
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(validator.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let validator = JwtValidator::new("test-secret", Duration::from_secs(60));
        assert!(validator.validate_token("not.a.token").is_err());
    }
}
