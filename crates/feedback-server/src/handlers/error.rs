//! Mapping of domain errors to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use feedback_core::{FeedbackError, StoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    /// `context` is what the client sees; `source` is only logged.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },
}

impl ApiError {
    /// Wrap a store failure under a client-facing message
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }

    pub fn from_feedback(err: FeedbackError, context: &'static str) -> ApiError {
        match err {
            FeedbackError::Validation(e) => ApiError::Validation(e),
            FeedbackError::Store(source) => ApiError::Store { context, source },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to return to clients
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Store { context, .. } => context.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store { context, source } = &self {
            tracing::error!("{}: {}", context, source);
        }
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}
