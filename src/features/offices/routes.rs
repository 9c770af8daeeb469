use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::faqs::FaqService;
use crate::features::files::FileService;
use crate::features::offices::handlers;

/// Services behind the office workspace
#[derive(Clone)]
pub struct OfficeState {
    pub files: Arc<FileService>,
    pub faqs: Arc<FaqService>,
}

pub fn public_routes() -> Router {
    Router::new().route("/api/offices", get(handlers::list_offices))
}

pub fn protected_routes(state: OfficeState) -> Router {
    Router::new()
        .route(
            "/api/offices/{office}/files",
            get(handlers::list_office_workspace_files),
        )
        .route(
            "/api/offices/{office}/faqs",
            get(handlers::list_office_workspace_faqs),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::faqs::services::FaqCache;
    use crate::features::moderation::ModerationService;
    use crate::features::offices::models::Office;
    use crate::modules::storage::LocalStorage;
    use crate::shared::test_helpers::{create_admin_user, create_regular_user, lazy_pool, with_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::time::Duration;

    fn state() -> OfficeState {
        let pool = lazy_pool();
        let storage = Arc::new(LocalStorage::with_root(
            std::env::temp_dir().join("uploads"),
            1024 * 1024,
        ));
        OfficeState {
            files: Arc::new(FileService::new(
                pool.clone(),
                storage,
                Arc::new(ModerationService::new(pool.clone())),
            )),
            faqs: Arc::new(FaqService::new(pool, FaqCache::new(Duration::from_secs(60)))),
        }
    }

    #[tokio::test]
    async fn test_list_offices_is_public() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server.get("/api/offices").await;
        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["meta"]["total"], 19);
        assert_eq!(body["data"][12], "R&D Office");
    }

    #[tokio::test]
    async fn test_workspace_requires_admin() {
        let server =
            TestServer::new(with_auth(protected_routes(state()), create_regular_user())).unwrap();
        server
            .get("/api/offices/Library%20Office/files")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_open_other_office_workspace() {
        let server = TestServer::new(with_auth(
            protected_routes(state()),
            create_admin_user(Office::LibraryOffice),
        ))
        .unwrap();

        server
            .get("/api/offices/Mess%20Office/files")
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .get("/api/offices/Mess%20Office/faqs")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_office_is_bad_request() {
        let server = TestServer::new(with_auth(
            protected_routes(state()),
            create_admin_user(Office::LibraryOffice),
        ))
        .unwrap();
        server
            .get("/api/offices/Treasury/faqs")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
