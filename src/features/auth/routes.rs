use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Public auth routes (no authentication required)
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .with_state(service)
}

/// Protected auth routes (require a valid token)
pub fn protected_routes() -> Router {
    Router::new().route("/api/auth/current", get(handlers::get_current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::JwtValidator;
    use crate::features::users::UserService;
    use crate::shared::test_helpers::{create_regular_user, lazy_pool, with_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::time::Duration;

    fn auth_service() -> Arc<AuthService> {
        let config = AuthConfig {
            jwt_secret: "secret".to_string(),
            jwt_expire: Duration::from_secs(60),
            cookie_expire_days: 1,
            cookie_name: "token".to_string(),
            cookie_secure: false,
        };
        Arc::new(AuthService::new(
            Arc::new(UserService::new(lazy_pool())),
            Arc::new(JwtValidator::new(&config.jwt_secret, config.jwt_expire)),
            config,
        ))
    }

    #[tokio::test]
    async fn test_current_returns_injected_user() {
        let user = create_regular_user();
        let server = TestServer::new(with_auth(protected_routes(), user.clone())).unwrap();

        let response = server.get("/api/auth/current").await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["email"], user.email);
        assert_eq!(body["data"]["role"], "user");
    }

    #[tokio::test]
    async fn test_current_without_user_is_unauthorized() {
        let server = TestServer::new(protected_routes()).unwrap();
        server
            .get("/api/auth/current")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_rejects_invalid_email() {
        let server = TestServer::new(public_routes(auth_service())).unwrap();
        server
            .post("/api/auth/login")
            .json(&json!({"email": "bad"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let server = TestServer::new(public_routes(auth_service())).unwrap();
        let response = server.post("/api/auth/logout").await;
        response.assert_status_ok();

        let set_cookie = response.header("set-cookie");
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_logout_with_session_cookie_expires_it() {
        let server = TestServer::new(public_routes(auth_service())).unwrap();
        let response = server
            .post("/api/auth/logout")
            .add_header(
                axum::http::header::COOKIE,
                axum::http::HeaderValue::from_static("token=abc"),
            )
            .await;
        response.assert_status_ok();

        let set_cookie = response.header("set-cookie");
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with("token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
