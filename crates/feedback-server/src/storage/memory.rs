//! In-memory feedback store (process-local, lost on restart)

use async_trait::async_trait;
use chrono::Utc;
use feedback_core::{FeedbackRecord, FeedbackStore, NewFeedback, StoreError, StoreHealth};
use tokio::sync::RwLock;

/// Records held in insertion order behind a lock.
///
/// `created_at` is clamped so it never goes backwards, which keeps insertion
/// order and time order identical even if the wall clock steps back.
pub struct MemoryStore {
    records: RwLock<Vec<FeedbackRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn create(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        let mut records = self.records.write().await;

        let now = Utc::now();
        let created_at = match records.last() {
            Some(last) if last.created_at > now => last.created_at,
            _ => now,
        };

        let record = FeedbackRecord::new(feedback, created_at);
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, limit: usize) -> Result<Vec<FeedbackRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn health(&self) -> StoreHealth {
        StoreHealth { connected: true }
    }
}
