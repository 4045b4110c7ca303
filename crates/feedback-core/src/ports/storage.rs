//! Storage trait for feedback persistence

use crate::error::{Result, StoreError};
use crate::types::{FeedbackInput, FeedbackRecord, NewFeedback};
use crate::validation::validate;
use async_trait::async_trait;

/// Connectivity snapshot of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHealth {
    pub connected: bool,
}

/// Feedback store
///
/// Implementations own id assignment, timestamps and ordering. Records are
/// never updated in place.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persist a validated payload and return it with generated fields.
    async fn create(
        &self,
        feedback: NewFeedback,
    ) -> std::result::Result<FeedbackRecord, StoreError>;

    /// Newest-first records, at most `limit` of them.
    async fn list(&self, limit: usize) -> std::result::Result<Vec<FeedbackRecord>, StoreError>;

    /// Remove a record. Returns whether anything was removed.
    async fn delete_by_id(&self, id: &str) -> std::result::Result<bool, StoreError>;

    async fn count(&self) -> std::result::Result<u64, StoreError>;

    /// Never fails; an unreachable backend reports `connected: false`.
    async fn health(&self) -> StoreHealth;

    /// Validate a raw submission and store it.
    async fn submit(&self, input: FeedbackInput) -> Result<FeedbackRecord> {
        let feedback = validate(input)?;
        Ok(self.create(feedback).await?)
    }
}
