//! # Handoff Repository
//!
//! The single-slot mailbox behind cart reproduction: a history screen stores
//! a snapshot of line items, the next register session consumes it at most
//! once.
//!
//! ## Read-Then-Clear
//! Consumption is a single `DELETE ... RETURNING` statement, so the read and
//! the clear cannot be split by a concurrent consumer - exactly one caller
//! gets the snapshot, everyone else gets nothing.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use lane_core::LineItem;

/// Repository for the cart reproduction snapshot.
#[derive(Debug, Clone)]
pub struct HandoffRepository {
    pool: SqlitePool,
}

impl HandoffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        HandoffRepository { pool }
    }

    /// Persists a snapshot of the given lines, overwriting any pending one.
    pub async fn store(&self, lines: &[LineItem]) -> DbResult<()> {
        debug!(lines = lines.len(), "Storing cart reproduction snapshot");

        let payload = serde_json::to_string(lines)?;

        sqlx::query(
            "INSERT INTO cart_handoff (slot, payload) VALUES (0, ?1)
             ON CONFLICT (slot) DO UPDATE SET payload = excluded.payload",
        )
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Takes the pending snapshot, if any, deleting it in the same
    /// statement. A second call - or a concurrent one - gets `None`.
    pub async fn take(&self) -> DbResult<Option<Vec<LineItem>>> {
        let payload: Option<String> =
            sqlx::query_scalar("DELETE FROM cart_handoff WHERE slot = 0 RETURNING payload")
                .fetch_optional(&self.pool)
                .await?;

        match payload {
            Some(payload) => {
                let lines: Vec<LineItem> = serde_json::from_str(&payload)?;
                debug!(lines = lines.len(), "Consumed cart reproduction snapshot");
                Ok(Some(lines))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use lane_core::Money;

    fn line(barcode: &str, price: i64, quantity: i64) -> LineItem {
        LineItem {
            sale_id: 42,
            product_barcode: barcode.to_string(),
            name_snapshot: format!("Product {}", barcode),
            unit_price_snapshot: Money::from_units(price),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_consumed_at_most_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let handoff = db.handoff();

        let lines = vec![line("A", 100, 2), line("B", 300, 1)];
        handoff.store(&lines).await.unwrap();

        let first = handoff.take().await.unwrap();
        assert_eq!(first, Some(lines));

        let second = handoff.take().await.unwrap();
        assert_eq!(second, None);
    }

    #[tokio::test]
    async fn test_store_overwrites_pending_snapshot() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let handoff = db.handoff();

        handoff.store(&[line("OLD", 100, 1)]).await.unwrap();
        handoff.store(&[line("NEW", 200, 3)]).await.unwrap();

        let taken = handoff.take().await.unwrap().unwrap();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].product_barcode, "NEW");
        assert_eq!(taken[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_take_with_nothing_pending() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_eq!(db.handoff().take().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_consumers_one_winner() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let handoff = db.handoff();

        handoff.store(&[line("A", 100, 1)]).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handoff = handoff.clone();
            tasks.push(tokio::spawn(async move { handoff.take().await.unwrap() }));
        }

        let mut hits = 0;
        for task in tasks {
            if task.await.unwrap().is_some() {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
    }
}
