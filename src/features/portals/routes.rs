use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::portals::handlers;
use crate::features::portals::services::PortalService;

pub fn public_routes(service: Arc<PortalService>) -> Router {
    Router::new()
        .route("/api/portals", get(handlers::list_portals))
        .route("/api/portals/pinned", get(handlers::list_pinned_portals))
        .with_state(service)
}

pub fn protected_routes(service: Arc<PortalService>) -> Router {
    Router::new()
        .route("/api/portals", post(handlers::create_portal))
        .route("/api/portals/unapproved", get(handlers::list_unapproved_portals))
        .route(
            "/api/portals/{id}",
            put(handlers::update_portal).delete(handlers::delete_portal),
        )
        .route("/api/portals/{id}/pin", put(handlers::toggle_portal_pin))
        .route("/api/portals/{id}/approve", put(handlers::approve_portal))
        .route("/api/portals/{id}/reject", put(handlers::reject_portal))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::moderation::ModerationService;
    use crate::features::offices::models::Office;
    use crate::shared::test_helpers::{
        create_admin_user, create_regular_user, create_super_admin_user, lazy_pool, with_auth,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<PortalService> {
        let pool = lazy_pool();
        Arc::new(PortalService::new(
            pool.clone(),
            Arc::new(ModerationService::new(pool)),
        ))
    }

    #[tokio::test]
    async fn test_regular_user_cannot_pin() {
        let server =
            TestServer::new(with_auth(protected_routes(service()), create_regular_user())).unwrap();
        server
            .put(&format!("/api/portals/{}/pin", uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_long_title_is_rejected() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_admin_user(Office::ExaminationsOffice),
        ))
        .unwrap();
        server
            .post("/api/portals")
            .json(&json!({
                "title": "x".repeat(51),
                "url": "https://exams.example.edu",
                "office": "Examinations Office"
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_cannot_create_for_other_office() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_admin_user(Office::ExaminationsOffice),
        ))
        .unwrap();
        server
            .post("/api/portals")
            .json(&json!({"title": "Menu", "url": "https://mess.example.edu", "office": "Mess Office"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_reject_body_is_bad_request() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_super_admin_user(),
        ))
        .unwrap();
        server
            .put(&format!("/api/portals/{}/reject", uuid::Uuid::now_v7()))
            .text("{not json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
