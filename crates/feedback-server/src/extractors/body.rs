//! Submission body extractor
//!
//! Both POST routes take either a JSON or a urlencoded form body, picked by
//! `Content-Type`. Anything that is not a form is parsed as JSON.

use crate::handlers::ApiError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use feedback_core::FeedbackInput;

/// A raw feedback submission, whatever its encoding
#[derive(Debug)]
pub struct FeedbackBody(pub FeedbackInput);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for FeedbackBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(input) = Form::<FeedbackInput>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(input))
        } else {
            let Json(input) = Json::<FeedbackInput>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            Ok(Self(input))
        }
    }
}
