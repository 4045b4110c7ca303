//! HTML page and form submission

use crate::extractors::FeedbackBody;
use crate::handlers::ApiError;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use feedback_core::FeedbackError;
use tracing::{error, info};

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Form post from the page; redirects back to it on success
pub async fn submit(
    State(state): State<AppState>,
    body: Result<FeedbackBody, ApiError>,
) -> Response {
    let FeedbackBody(input) = match body {
        Ok(body) => body,
        Err(e) => {
            let status = e.status_code();
            return (status, e.public_message()).into_response();
        }
    };

    match state.store.submit(input).await {
        Ok(record) => {
            info!("New feedback from {}: {}", record.name, record.message);
            (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
        }
        Err(FeedbackError::Validation(e)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(FeedbackError::Store(e)) => {
            error!("Error saving feedback: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error saving feedback").into_response()
        }
    }
}
