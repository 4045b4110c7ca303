//! Admission checks for feedback submissions
//!
//! Applied uniformly before any store sees a record, so every backend
//! enforces the same constraints.

use crate::error::ValidationError;
use crate::types::{
    FeedbackInput, NewFeedback, DEFAULT_CATEGORY, DEFAULT_RATING, MAX_RATING, MIN_RATING,
};
use serde_json::Value;

/// Check a raw submission and normalize it into a creation payload.
///
/// `name` and `message` are trimmed and must be non-empty. A missing or
/// blank category becomes `"general"`; a missing, null or blank rating
/// becomes `5`. Email is passed through untouched.
pub fn validate(input: FeedbackInput) -> Result<NewFeedback, ValidationError> {
    let name = required(input.name, "name")?;
    let message = required(input.message, "message")?;

    let category = input
        .category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let rating = parse_rating(input.rating.as_ref())?;

    Ok(NewFeedback {
        name,
        email: input.email,
        category,
        rating,
        message,
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

fn parse_rating(value: Option<&Value>) -> Result<u8, ValidationError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_RATING),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(DEFAULT_RATING),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(_) => None,
    };

    match raw {
        Some(r) if (MIN_RATING as i64..=MAX_RATING as i64).contains(&r) => Ok(r as u8),
        _ => Err(ValidationError::InvalidField {
            field: "rating",
            reason: format!("must be an integer between {MIN_RATING} and {MAX_RATING}"),
        }),
    }
}
