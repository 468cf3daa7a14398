//! # Terminal Identity Repository
//!
//! A single generated identifier names this installation on every sale it
//! commits. Generated once, persisted forever, cached for the process
//! lifetime.
//!
//! ## First-Call Race
//! Two callers racing the very first lookup must still agree on one value.
//! The insert is `ON CONFLICT DO NOTHING` against a slot-constrained
//! single-row table, so whichever candidate lands first wins and the
//! follow-up read returns the winner to everyone.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::info;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Repository for the write-once terminal identity.
#[derive(Debug, Clone)]
pub struct TerminalRepository {
    pool: SqlitePool,

    /// Shared with every handle cloned from the same [`crate::Database`], so
    /// the identity is read from storage at most once per process.
    cache: Arc<OnceCell<String>>,
}

impl TerminalRepository {
    pub fn new(pool: SqlitePool, cache: Arc<OnceCell<String>>) -> Self {
        TerminalRepository { pool, cache }
    }

    /// Returns the terminal identity, generating and persisting it on the
    /// first call ever made against this database.
    pub async fn get_or_create_id(&self) -> DbResult<String> {
        let id = self
            .cache
            .get_or_try_init(|| self.load_or_generate())
            .await?;
        Ok(id.clone())
    }

    async fn load_or_generate(&self) -> DbResult<String> {
        let candidate = Uuid::new_v4().to_string();

        // Lands only if no identity exists yet; a concurrent winner's row
        // survives untouched.
        let inserted = sqlx::query(
            "INSERT INTO terminal_identity (slot, terminal_id) VALUES (0, ?1)
             ON CONFLICT (slot) DO NOTHING",
        )
        .bind(&candidate)
        .execute(&self.pool)
        .await?;

        let id: String =
            sqlx::query_scalar("SELECT terminal_id FROM terminal_identity WHERE slot = 0")
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| {
                    DbError::Internal("terminal identity vanished after insert".to_string())
                })?;

        if inserted.rows_affected() > 0 {
            info!(terminal_id = %id, "Generated terminal identity");
        }

        Ok(id)
    }
}
