use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::quick_links::handlers;
use crate::features::quick_links::services::QuickLinkService;

/// Public quick link routes
pub fn public_routes(service: Arc<QuickLinkService>) -> Router {
    Router::new()
        .route("/api/quicklinks", get(handlers::list_quick_links))
        .route("/api/quicklinks/pinned", get(handlers::list_pinned_quick_links))
        .with_state(service)
}

/// Protected quick link routes
pub fn protected_routes(service: Arc<QuickLinkService>) -> Router {
    Router::new()
        .route("/api/quicklinks", post(handlers::create_quick_link))
        .route(
            "/api/quicklinks/unapproved",
            get(handlers::list_unapproved_quick_links),
        )
        .route("/api/quicklinks/my-links", get(handlers::list_my_quick_links))
        .route(
            "/api/quicklinks/{id}",
            put(handlers::update_quick_link).delete(handlers::delete_quick_link),
        )
        .route("/api/quicklinks/{id}/pin", put(handlers::pin_quick_link))
        .route("/api/quicklinks/{id}/unpin", put(handlers::unpin_quick_link))
        .route("/api/quicklinks/{id}/approve", put(handlers::approve_quick_link))
        .route("/api/quicklinks/{id}/reject", put(handlers::reject_quick_link))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::moderation::ModerationService;
    use crate::features::offices::models::Office;
    use crate::shared::test_helpers::{
        create_admin_user, create_regular_user, create_super_admin_user, lazy_pool, with_auth,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<QuickLinkService> {
        let pool = lazy_pool();
        Arc::new(QuickLinkService::new(
            pool.clone(),
            Arc::new(ModerationService::new(pool)),
        ))
    }

    fn server_as(user: AuthenticatedUser) -> TestServer {
        TestServer::new(with_auth(protected_routes(service()), user)).unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_login() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .post("/api/quicklinks")
            .json(&json!({"title": "ERP", "url": "https://erp.example.edu", "office": "Accounts Office"}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_regular_user_cannot_create() {
        let server = server_as(create_regular_user());
        server
            .post("/api/quicklinks")
            .json(&json!({"title": "ERP", "url": "https://erp.example.edu", "office": "Accounts Office"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_create_for_other_office() {
        let server = server_as(create_admin_user(Office::LibraryOffice));
        server
            .post("/api/quicklinks")
            .json(&json!({"title": "Menu", "url": "https://mess.example.edu", "office": "Mess Office"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let server = server_as(create_admin_user(Office::LibraryOffice));
        server
            .post("/api/quicklinks")
            .json(&json!({"title": "Catalogue", "url": "catalogue", "office": "Library Office"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_title_is_rejected() {
        let server = server_as(create_admin_user(Office::LibraryOffice));
        server
            .post("/api/quicklinks")
            .json(&json!({"title": "   ", "url": "https://lib.example.edu", "office": "Library Office"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put(&format!("/api/quicklinks/{}", uuid::Uuid::now_v7()))
            .json(&json!({"title": "  "}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_cannot_list_unapproved() {
        let server = server_as(create_admin_user(Office::LibraryOffice));
        server
            .get("/api/quicklinks/unapproved")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reject_without_comment_is_bad_request() {
        let server = server_as(create_super_admin_user());
        let response = server
            .put(&format!("/api/quicklinks/{}/reject", uuid::Uuid::now_v7()))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Rejection comment required"
        );
    }
}
