use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::features::faqs::handlers;
use crate::features::faqs::services::FaqService;

pub fn public_routes(service: Arc<FaqService>) -> Router {
    Router::new()
        .route("/api/faqs", get(handlers::list_faqs))
        .route("/api/faqs/office/{office}", get(handlers::list_office_faqs))
        .route("/api/faqs/search", get(handlers::search_faqs))
        .route("/api/faqs/search-similar", get(handlers::search_similar_faqs))
        .with_state(service)
}

pub fn protected_routes(service: Arc<FaqService>) -> Router {
    Router::new()
        .route("/api/faqs", post(handlers::create_faq))
        .route(
            "/api/faqs/{id}",
            put(handlers::update_faq).delete(handlers::delete_faq),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::faqs::services::FaqCache;
    use crate::features::offices::models::Office;
    use crate::shared::test_helpers::{create_admin_user, create_regular_user, lazy_pool, with_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use std::time::Duration;

    fn service() -> Arc<FaqService> {
        Arc::new(FaqService::new(
            lazy_pool(),
            FaqCache::new(Duration::from_secs(60)),
        ))
    }

    #[tokio::test]
    async fn test_search_requires_keyword() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server.get("/api/faqs/search").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<serde_json::Value>()["error"],
            "Keyword is required"
        );

        server
            .get("/api/faqs/search")
            .add_query_param("keyword", "  ")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_similar_without_tokens_is_empty() {
        let server = TestServer::new(public_routes(service())).unwrap();

        let response = server
            .get("/api/faqs/search-similar")
            .add_query_param("question", "is it ok?")
            .add_query_param("office", "Hostel Office")
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn test_similar_with_unknown_office_is_bad_request() {
        let server = TestServer::new(public_routes(service())).unwrap();
        server
            .get("/api/faqs/search-similar")
            .add_query_param("question", "When is the fee due?")
            .add_query_param("office", "Treasury")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_regular_user_cannot_create() {
        let server =
            TestServer::new(with_auth(protected_routes(service()), create_regular_user())).unwrap();
        server
            .post("/api/faqs")
            .json(&json!({"question": "Fee due?", "answer": "Soon", "office": "Hostel Office"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_cannot_create_for_other_office() {
        let server = TestServer::new(with_auth(
            protected_routes(service()),
            create_admin_user(Office::LibraryOffice),
        ))
        .unwrap();
        server
            .post("/api/faqs")
            .json(&json!({"question": "Fee due?", "answer": "Soon", "office": "Hostel Office"}))
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
