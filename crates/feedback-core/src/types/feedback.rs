//! Feedback record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category applied when a submission does not name one
pub const DEFAULT_CATEGORY: &str = "general";

/// Rating applied when a submission does not carry one
pub const DEFAULT_RATING: u8 = 5;

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;

/// Highest accepted rating
pub const MAX_RATING: u8 = 5;

/// A stored feedback submission.
///
/// Records are immutable once created; the only lifecycle transition after
/// creation is deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub category: String,
    pub rating: u8,
    pub message: String,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Build a record from a validated payload, assigning a fresh id.
    pub fn new(feedback: NewFeedback, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: feedback.name,
            email: feedback.email,
            category: feedback.category,
            rating: feedback.rating,
            message: feedback.message,
            created_at,
        }
    }
}

/// A validated creation payload with defaults already applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub name: String,
    pub email: Option<String>,
    pub category: String,
    pub rating: u8,
    pub message: String,
}

impl NewFeedback {
    /// Payload with default category and rating
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            category: DEFAULT_CATEGORY.to_string(),
            rating: DEFAULT_RATING,
            message: message.into(),
        }
    }
}

/// Raw submission as received from a client, before validation.
///
/// `rating` is kept as an untyped JSON value because form posts deliver it
/// as a string while JSON clients send a number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FeedbackInput {
    /// Submission carrying only the required fields
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }
}
