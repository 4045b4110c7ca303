//! Health check handlers
//!
//! Always 200: a dead database shows up in the body, not the status.

use crate::AppState;
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
}

impl HealthResponse {
    fn ok(database: Option<&'static str>) -> Self {
        Self {
            status: "OK",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            database,
        }
    }
}

/// Liveness plus store connectivity, for the `/api` surface
pub async fn api_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.store.health().await.connected {
        "connected"
    } else {
        "disconnected"
    };
    Json(HealthResponse::ok(Some(database)))
}

/// Plain liveness, for the page surface
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok(None))
}
