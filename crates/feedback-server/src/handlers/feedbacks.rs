//! Feedback handlers

use crate::extractors::FeedbackBody;
use crate::handlers::ApiError;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use feedback_core::FeedbackRecord;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<FeedbackRecord>>, ApiError> {
    let feedbacks = state
        .store
        .list(state.list_limit)
        .await
        .map_err(ApiError::store("Failed to fetch feedbacks"))?;
    Ok(Json(feedbacks))
}

pub async fn create(
    State(state): State<AppState>,
    FeedbackBody(input): FeedbackBody,
) -> Result<(StatusCode, Json<FeedbackRecord>), ApiError> {
    let record = state
        .store
        .submit(input)
        .await
        .map_err(|e| ApiError::from_feedback(e, "Failed to save feedback"))?;

    info!(
        "New feedback from {} ({}) - Rating: {}/5",
        record.name, record.category, record.rating
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// Reports success whether or not the id existed.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state
        .store
        .delete_by_id(&id)
        .await
        .map_err(ApiError::store("Failed to delete feedback"))?;
    if !removed {
        debug!("Delete requested for unknown feedback {}", id);
    }

    Ok(Json(MessageResponse {
        message: "Feedback deleted successfully".to_string(),
    }))
}
