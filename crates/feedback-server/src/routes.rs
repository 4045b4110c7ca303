//! Router assembly
//!
//! The SQLite backend serves the JSON API under `/api`; the in-memory
//! backend serves the HTML page and its companion endpoints at the root.

use crate::config::StoreBackend;
use crate::handlers;
use crate::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState, backend: StoreBackend) -> Router {
    let routes = match backend {
        StoreBackend::Sqlite => Router::new().nest("/api", api_routes()),
        StoreBackend::Memory => page_routes(),
    };

    routes
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::api_health))
        .route(
            "/feedbacks",
            get(handlers::feedbacks::list).post(handlers::feedbacks::create),
        )
        .route("/feedbacks/:id", delete(handlers::feedbacks::delete))
        .route("/stats", get(handlers::stats::stats))
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/feedbacks", get(handlers::feedbacks::list))
        .route("/submit", post(handlers::page::submit))
        .route("/health", get(handlers::health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{DateTime, Utc};
    use feedback_core::FeedbackStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state_with(store: Arc<dyn FeedbackStore>, list_limit: usize) -> AppState {
        AppState { store, list_limit }
    }

    fn api_app() -> (Router, Arc<dyn FeedbackStore>) {
        let store: Arc<dyn FeedbackStore> = Arc::new(MemoryStore::new());
        let app = build_router(state_with(store.clone(), 50), StoreBackend::Sqlite);
        (app, store)
    }

    fn page_app() -> (Router, Arc<dyn FeedbackStore>) {
        let store: Arc<dyn FeedbackStore> = Arc::new(MemoryStore::new());
        let app = build_router(state_with(store.clone(), 20), StoreBackend::Memory);
        (app, store)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_feedback(body: Value) -> Request<Body> {
        post_json("/api/feedbacks", body)
    }

    fn post_form(uri: &str, body: &'static str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_newest_first() {
        let (app, _) = api_app();
        let before = Utc::now();

        let older = json!({ "name": "Bob", "message": "First" });
        let (status, older) = send_json(&app, post_feedback(older)).await;
        assert_eq!(status, StatusCode::CREATED);

        let ann = json!({ "name": "Ann", "message": "Great app" });
        let (status, created) = send_json(&app, post_feedback(ann)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Ann");
        assert_eq!(created["message"], "Great app");
        assert_eq!(created["category"], "general");
        assert_eq!(created["rating"], 5);
        assert!(!created["id"].as_str().unwrap().is_empty());
        let created_at: DateTime<Utc> = created["created_at"].as_str().unwrap().parse().unwrap();
        assert!(created_at >= before);

        let (status, listed) = send_json(&app, get_req("/api/feedbacks")).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], created);
        assert_eq!(listed[1], older);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_without_storing() {
        let (app, store) = api_app();

        let (status, body) = send_json(&app, post_feedback(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Name and message are required" }));

        let (status, _) = send_json(&app, post_feedback(json!({ "name": "Ann" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_rejected() {
        let (app, store) = api_app();

        for rating in [json!(0), json!(6), json!("ten")] {
            let input = json!({ "name": "Ann", "message": "hi", "rating": rating });
            let (status, body) = send_json(&app, post_feedback(input)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].as_str().unwrap().contains("rating"));
        }
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_client_error() {
        let (app, _) = api_app();
        let request = Request::post("/api/feedbacks")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_truncated_to_configured_limit() {
        let (app, _) = api_app();
        for i in 0..51 {
            let input = json!({ "name": "u", "message": format!("m{}", i) });
            let (status, _) = send(&app, post_feedback(input)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, listed) = send_json(&app, get_req("/api/feedbacks")).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 50);
        assert_eq!(listed[0]["message"], "m50");
        assert_eq!(listed[49]["message"], "m1");
    }

    #[tokio::test]
    async fn test_delete_is_reported_successful_twice() {
        let (app, _) = api_app();
        let input = json!({ "name": "Ann", "message": "bye" });
        let (_, created) = send_json(&app, post_feedback(input)).await;
        let uri = format!("/api/feedbacks/{}", created["id"].as_str().unwrap());

        for _ in 0..2 {
            let request = Request::delete(uri.as_str()).body(Body::empty()).unwrap();
            let (status, body) = send_json(&app, request).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({ "message": "Feedback deleted successfully" }));
        }

        let (_, listed) = send_json(&app, get_req("/api/feedbacks")).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_counts_records() {
        let (app, _) = api_app();
        for name in ["a", "b", "c"] {
            send(&app, post_feedback(json!({ "name": name, "message": "x" }))).await;
        }

        let (status, body) = send_json(&app, get_req("/api/stats")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "total_feedbacks": 3 }));
    }

    #[tokio::test]
    async fn test_api_health_reports_connected() {
        let (app, _) = api_app();
        let (status, body) = send_json(&app, get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["database"], "connected");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_unreachable_database_degrades_to_500() {
        let dir = tempfile::TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}?mode=ro",
            dir.path().join("missing").join("feedback.db").display()
        );
        let store: Arc<dyn FeedbackStore> = Arc::new(
            SqliteStore::connect(&url, 1, Duration::from_millis(500))
                .await
                .unwrap(),
        );
        let app = build_router(state_with(store, 50), StoreBackend::Sqlite);

        let (status, body) = send_json(&app, get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"], "disconnected");

        let (status, body) = send_json(&app, get_req("/api/feedbacks")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch feedbacks" }));

        let input = json!({ "name": "Ann", "message": "hi" });
        let (status, body) = send_json(&app, post_feedback(input)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to save feedback" }));

        let (status, body) = send_json(&app, get_req("/api/stats")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to get stats" }));
    }

    #[tokio::test]
    async fn test_page_served() {
        let (app, _) = page_app();
        let response = app.clone().oneshot(get_req("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_form_submit_redirects_and_lists() {
        let (app, _) = page_app();

        let response = app
            .clone()
            .oneshot(post_form("/submit", "name=Ann&message=Great+app"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let (status, listed) = send_json(&app, get_req("/feedbacks")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed[0]["name"], "Ann");
        assert_eq!(listed[0]["message"], "Great app");
        assert_eq!(listed[0]["rating"], 5);
    }

    #[tokio::test]
    async fn test_api_create_accepts_form_body() {
        let (app, _) = api_app();

        let request = post_form("/api/feedbacks", "name=Ann&message=hi&rating=4");
        let (status, created) = send_json(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Ann");
        assert_eq!(created["rating"], 4);
    }

    #[tokio::test]
    async fn test_form_submit_accepts_json_body() {
        let (app, store) = page_app();

        let request = post_json("/submit", json!({ "name": "Ann", "message": "hi" }));
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::FOUND);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_form_submit_missing_message_is_plain_400() {
        let (app, store) = page_app();

        let (status, body) = send(&app, post_form("/submit", "name=Ann")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = String::from_utf8(body).unwrap();
        assert_eq!(body, "Name and message are required");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_list_limited_to_twenty() {
        let (app, store) = page_app();
        for i in 0..25 {
            store
                .create(feedback_core::NewFeedback::new("u", format!("m{}", i)))
                .await
                .unwrap();
        }

        let (_, listed) = send_json(&app, get_req("/feedbacks")).await;
        let listed = listed.as_array().unwrap();
        assert_eq!(listed.len(), 20);
        assert_eq!(listed[0]["message"], "m24");
    }

    #[tokio::test]
    async fn test_page_health_has_no_database_field() {
        let (app, _) = page_app();
        let (status, body) = send_json(&app, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert!(body.get("database").is_none());
    }

    #[tokio::test]
    async fn test_surfaces_do_not_overlap() {
        let (page, _) = page_app();
        let (status, _) = send(&page, get_req("/api/feedbacks")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (api, _) = api_app();
        let (status, _) = send(&api, get_req("/feedbacks")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
