use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Public user routes (no authentication required)
pub fn public_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .with_state(service)
}

/// Protected user routes; writes are superadmin only
pub fn protected_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/{user}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/api/users/{user}/role", put(handlers::update_user_role))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::offices::models::Office;
    use crate::shared::test_helpers::{
        create_admin_user, create_super_admin_user, lazy_pool, with_auth,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn server_as_admin() -> TestServer {
        let service = Arc::new(UserService::new(lazy_pool()));
        let app = with_auth(
            protected_routes(service),
            create_admin_user(Office::LibraryOffice),
        );
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_list_requires_login() {
        let service = Arc::new(UserService::new(lazy_pool()));
        let server = TestServer::new(protected_routes(service)).unwrap();

        let response = server.get("/api/users").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<serde_json::Value>()["error"], "Not authorized");
    }

    #[tokio::test]
    async fn test_admin_cannot_create_user() {
        let server = server_as_admin();

        let response = server
            .post("/api/users")
            .json(&json!({"email": "new.user@example.edu"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_delete_user() {
        let server = server_as_admin();

        server
            .delete("/api/users/someone@example.edu")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_change_roles() {
        let server = server_as_admin();

        let response = server
            .put("/api/users/someone@example.edu/role")
            .json(&json!({"role": "superadmin"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Superadmin access required"
        );
    }

    #[tokio::test]
    async fn test_superadmin_passes_user_management_policy() {
        let service = Arc::new(UserService::new(lazy_pool()));
        let server =
            TestServer::new(with_auth(protected_routes(service), create_super_admin_user()))
                .unwrap();

        let response = server
            .put("/api/users/someone@example.edu/role")
            .json(&json!({"role": "owner"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["error"], "Invalid role");
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let service = Arc::new(UserService::new(lazy_pool()));
        let server = TestServer::new(public_routes(service)).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&json!({"email": "nope"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
