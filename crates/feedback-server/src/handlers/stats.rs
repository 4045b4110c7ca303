//! Stats handler

use crate::handlers::ApiError;
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_feedbacks: u64,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let total_feedbacks = state
        .store
        .count()
        .await
        .map_err(ApiError::store("Failed to get stats"))?;
    Ok(Json(StatsResponse { total_feedbacks }))
}
