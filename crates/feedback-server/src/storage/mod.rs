//! Storage layer
//!
//! SQLite (embedded) for the durable store, a locked `Vec` for the
//! in-memory store. Both sit behind `FeedbackStore`.

pub mod db;
pub mod memory;

pub use db::SqliteStore;
pub use memory::MemoryStore;

use crate::config::{ServerConfig, StoreBackend};
use anyhow::{Context, Result};
use feedback_core::{FeedbackStore, NewFeedback, StoreError};
use std::sync::Arc;

/// Open the store selected by configuration
pub async fn open(config: &ServerConfig) -> Result<Arc<dyn FeedbackStore>> {
    let store: Arc<dyn FeedbackStore> = match config.store {
        StoreBackend::Sqlite => Arc::new(
            SqliteStore::connect(
                &config.database_url,
                config.max_connections,
                config.acquire_timeout,
            )
            .await
            .context("Failed to configure SQLite store")?,
        ),
        StoreBackend::Memory => {
            tracing::info!("Using in-memory storage (no database required)");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

/// Sample submissions inserted into an empty store
pub fn demo_records() -> Vec<NewFeedback> {
    vec![
        NewFeedback::new(
            "Demo User",
            "Welcome to the feedback app! This is a sample feedback.",
        ),
        NewFeedback::new(
            "Test User",
            "Submissions are listed newest first, right below the form.",
        ),
    ]
}

/// Insert the demo records if the store holds nothing yet.
///
/// Returns how many records were inserted.
pub async fn seed_demo_data(store: &dyn FeedbackStore) -> Result<usize, StoreError> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    let records = demo_records();
    let inserted = records.len();
    for feedback in records {
        store.create(feedback).await?;
    }
    Ok(inserted)
}
