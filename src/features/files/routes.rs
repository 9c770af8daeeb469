use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers;
use crate::features::files::services::FileService;

/// Multipart overhead allowed on top of the file size limit
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Public file routes; wrap with `optional_auth_middleware` so unapproved
/// files resolve for their office
pub fn public_routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route("/api/files/approved", get(handlers::list_approved_files))
        .route("/api/files/office/{office}", get(handlers::list_office_files))
        .route("/api/files/download/{id}", get(handlers::download_file))
        .route("/api/files/{id}", get(handlers::get_file))
        .with_state(service)
}

/// Protected file routes
pub fn protected_routes(service: Arc<FileService>) -> Router {
    let body_limit = service.max_upload_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/files/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/files/unapproved", get(handlers::list_unapproved_files))
        .route("/api/files/pending", get(handlers::list_pending_files))
        .route("/api/files/my-files", get(handlers::list_my_files))
        .route("/api/files/categories", post(handlers::add_office_category))
        .route(
            "/api/files/categories/{office}",
            get(handlers::list_office_categories),
        )
        .route(
            "/api/files/{id}",
            put(handlers::update_file).delete(handlers::delete_file),
        )
        .route("/api/files/{id}/approve", put(handlers::approve_file))
        .route("/api/files/{id}/reject", put(handlers::reject_file))
        .route(
            "/api/files/{id}/version",
            post(handlers::add_file_version).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::moderation::ModerationService;
    use crate::features::offices::models::Office;
    use crate::modules::storage::LocalStorage;
    use crate::shared::test_helpers::{
        create_admin_user, create_regular_user, create_super_admin_user, lazy_pool, with_auth,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    fn service() -> Arc<FileService> {
        let pool = lazy_pool();
        let storage = Arc::new(LocalStorage::with_root(
            std::env::temp_dir().join("uploads"),
            1024 * 1024,
        ));
        Arc::new(FileService::new(
            pool.clone(),
            storage,
            Arc::new(ModerationService::new(pool)),
        ))
    }

    fn server_as(user: crate::features::auth::model::AuthenticatedUser) -> TestServer {
        TestServer::new(with_auth(protected_routes(service()), user)).unwrap()
    }

    #[tokio::test]
    async fn test_protected_routes_require_login() {
        let server = TestServer::new(protected_routes(service())).unwrap();
        server
            .get("/api/files/my-files")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_regular_user_cannot_upload() {
        let server = server_as(create_regular_user());
        server
            .post("/api/files/upload")
            .multipart(
                axum_test::multipart::MultipartForm::new()
                    .add_text("name", "Fee Notice")
                    .add_text("office", "Accounts Office")
                    .add_text("category", "Notices")
                    .add_text("url", "https://docs.example.edu/fees"),
            )
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upload_without_file_or_url_is_bad_request() {
        let server = server_as(create_admin_user(Office::AccountsOffice));
        let response = server
            .post("/api/files/upload")
            .multipart(
                axum_test::multipart::MultipartForm::new()
                    .add_text("name", "Fee Notice")
                    .add_text("office", "Accounts Office")
                    .add_text("category", "Notices"),
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Please upload a file or provide a URL"
        );
    }

    #[tokio::test]
    async fn test_admin_cannot_approve() {
        let server = server_as(create_admin_user(Office::LibraryOffice));
        server
            .put(&format!("/api/files/{}/approve", uuid::Uuid::now_v7()))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reject_without_comment_is_bad_request() {
        let server = server_as(create_super_admin_user());
        let response = server
            .put(&format!("/api/files/{}/reject", uuid::Uuid::now_v7()))
            .json(&json!({}))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Rejection comment required"
        );
    }

    #[tokio::test]
    async fn test_admin_cannot_register_category_for_other_office() {
        let server = server_as(create_admin_user(Office::LibraryOffice));
        server
            .post("/api/files/categories")
            .json(&json!({"office": "Mess Office", "category": "Menus"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_padded_short_name_is_rejected_on_update() {
        let server = server_as(create_admin_user(Office::AccountsOffice));
        server
            .put(&format!("/api/files/{}", uuid::Uuid::now_v7()))
            .json(&json!({"name": "  x  "}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put(&format!("/api/files/{}", uuid::Uuid::now_v7()))
            .json(&json!({"category": "   "}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_short_version_name_is_rejected() {
        let server = server_as(create_admin_user(Office::AccountsOffice));
        let response = server
            .post(&format!("/api/files/{}/version", uuid::Uuid::now_v7()))
            .multipart(
                axum_test::multipart::MultipartForm::new()
                    .add_text("name", " F ")
                    .add_text("url", "https://docs.example.edu/fees-v2"),
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<serde_json::Value>()["error"]
            .as_str()
            .unwrap()
            .contains("at least 2 characters"));
    }

    #[tokio::test]
    async fn test_unknown_office_listing_is_bad_request() {
        let server = TestServer::new(public_routes(service())).unwrap();
        server
            .get("/api/files/office/Treasury")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
