use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::announcements::handlers;
use crate::features::announcements::services::AnnouncementService;
use crate::shared::constants::MAX_ANNOUNCEMENT_IMAGE_SIZE;

/// Multipart overhead allowed on top of the image size limit
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn public_routes(service: Arc<AnnouncementService>) -> Router {
    Router::new()
        .route("/api/announcements", get(handlers::list_announcements))
        .route("/api/announcements/latest", get(handlers::latest_announcements))
        .with_state(service)
}

pub fn protected_routes(service: Arc<AnnouncementService>) -> Router {
    let body_limit = MAX_ANNOUNCEMENT_IMAGE_SIZE + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/api/announcements",
            post(handlers::create_announcement).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/announcements/unapproved",
            get(handlers::list_unapproved_announcements),
        )
        .route(
            "/api/announcements/my-announcements",
            get(handlers::list_my_announcements),
        )
        .route(
            "/api/announcements/{id}",
            put(handlers::update_announcement)
                .layer(DefaultBodyLimit::max(body_limit))
                .delete(handlers::delete_announcement),
        )
        .route(
            "/api/announcements/{id}/approve",
            put(handlers::approve_announcement),
        )
        .route(
            "/api/announcements/{id}/reject",
            put(handlers::reject_announcement),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::announcements::services::AnnouncementCache;
    use crate::features::moderation::ModerationService;
    use crate::features::offices::models::Office;
    use crate::modules::storage::LocalStorage;
    use crate::shared::test_helpers::{
        create_admin_user, create_regular_user, lazy_pool, with_auth,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::time::Duration;

    fn service() -> Arc<AnnouncementService> {
        let pool = lazy_pool();
        let storage = Arc::new(LocalStorage::with_root(
            std::env::temp_dir().join("uploads"),
            1024 * 1024,
        ));
        Arc::new(AnnouncementService::new(
            pool.clone(),
            storage,
            Arc::new(ModerationService::new(pool)),
            AnnouncementCache::new(Duration::from_secs(60)),
        ))
    }

    #[tokio::test]
    async fn test_regular_user_cannot_create() {
        let server =
            TestServer::new(with_auth(protected_routes(service()), create_regular_user())).unwrap();
        server
            .post("/api/announcements")
            .multipart(
                axum_test::multipart::MultipartForm::new()
                    .add_text("title", "Library closed")
                    .add_text("office", "Library Office"),
            )
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_non_image_upload_is_rejected() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_admin_user(Office::LibraryOffice),
        ))
        .unwrap();
        let response = server
            .post("/api/announcements")
            .multipart(
                axum_test::multipart::MultipartForm::new()
                    .add_text("title", "Library closed")
                    .add_text("office", "Library Office")
                    .add_part(
                        "image",
                        axum_test::multipart::Part::bytes(b"%PDF-1.4".to_vec())
                            .file_name("notice.pdf"),
                    ),
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Only image files are allowed!"
        );
    }

    #[tokio::test]
    async fn test_admin_cannot_announce_for_other_office() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_admin_user(Office::LibraryOffice),
        ))
        .unwrap();
        server
            .post("/api/announcements")
            .multipart(
                axum_test::multipart::MultipartForm::new()
                    .add_text("title", "New menu")
                    .add_text("office", "Mess Office"),
            )
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unapproved_listing_requires_superadmin() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_admin_user(Office::LibraryOffice),
        ))
        .unwrap();
        server
            .get("/api/announcements/unapproved")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
