//! SQLite feedback store (embedded, durable)
//!
//! The pool connects lazily: a database that cannot be opened at startup
//! only makes individual operations fail, and the schema is applied on the
//! first operation that gets through.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use feedback_core::{FeedbackRecord, FeedbackStore, NewFeedback, StoreError, StoreHealth};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::OnceCell;

pub struct SqliteStore {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

impl SqliteStore {
    /// Build the pool and try to apply the schema. Only a malformed URL is an
    /// error here; an unreachable database is logged and tolerated.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Database(format!("invalid url: {}", e)))?
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let filename = options.clone().get_filename();
        if let Some(parent) = filename.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                );
            }
        }

        tracing::info!("Opening SQLite database at: {}", filename.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(options);

        let store = Self {
            pool,
            schema: OnceCell::new(),
        };

        match store.ensure_schema().await {
            Ok(()) => tracing::info!("Connected to SQLite, schema ready"),
            Err(e) => {
                tracing::error!("SQLite connection error: {}", e);
                tracing::warn!("Continuing without database...");
            }
        }

        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.schema
            .get_or_try_init(|| Self::run_migrations(&self.pool))
            .await?;
        Ok(())
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS feedbacks (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                email TEXT,
                category TEXT NOT NULL DEFAULT 'general',
                rating INTEGER NOT NULL DEFAULT 5 CHECK (rating BETWEEN 1 AND 5),
                message TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_feedbacks_created_at ON feedbacks (created_at DESC)
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_feedbacks_name ON feedbacks (name)
            "#,
        )
        .execute(pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl FeedbackStore for SqliteStore {
    async fn create(&self, feedback: NewFeedback) -> Result<FeedbackRecord, StoreError> {
        self.ensure_schema().await?;

        // Stored with microsecond precision; truncate so the returned record
        // matches what a later list reads back.
        let record = FeedbackRecord::new(feedback, Utc::now().trunc_subsecs(6));

        sqlx::query(
            r#"
            INSERT INTO feedbacks (id, name, email, category, rating, message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.category)
        .bind(i64::from(record.rating))
        .bind(&record.message)
        .bind(record.created_at.timestamp_micros())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(record)
    }

    async fn list(&self, limit: usize) -> Result<Vec<FeedbackRecord>, StoreError> {
        self.ensure_schema().await?;

        let rows: Vec<FeedbackRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, category, rating, message, created_at
            FROM feedbacks
            ORDER BY created_at DESC, seq DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(FeedbackRecord::try_from).collect()
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.ensure_schema().await?;

        let result = sqlx::query(
            r#"
            DELETE FROM feedbacks WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_schema().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedbacks")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(count.max(0) as u64)
    }

    async fn health(&self) -> StoreHealth {
        let connected = sqlx::query("SELECT 1").execute(&self.pool).await.is_ok();
        StoreHealth { connected }
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Database(other.to_string()),
    }
}

// Helper struct for sqlx query_as
#[derive(sqlx::FromRow)]
struct FeedbackRow {
    id: String,
    name: String,
    email: Option<String>,
    category: String,
    rating: i64,
    message: String,
    created_at: i64,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = StoreError;

    fn try_from(r: FeedbackRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(r.rating).map_err(|_| StoreError::Corrupt {
            id: r.id.clone(),
            reason: format!("rating out of range: {}", r.rating),
        })?;
        let created_at = DateTime::<Utc>::from_timestamp_micros(r.created_at).ok_or_else(|| {
            StoreError::Corrupt {
                id: r.id.clone(),
                reason: format!("invalid created_at: {}", r.created_at),
            }
        })?;

        Ok(FeedbackRecord {
            id: r.id,
            name: r.name,
            email: r.email,
            category: r.category,
            rating,
            message: r.message,
            created_at,
        })
    }
}
