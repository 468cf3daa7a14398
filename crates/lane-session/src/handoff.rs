//! # Cart Reproduction
//!
//! The one-time transfer of a historical line-item set back into an active
//! cart: the history screen requests it, the next register session consumes
//! it.
//!
//! Restored entries are rebuilt from the snapshot's own name, price and
//! quantity. There is deliberately no catalog re-lookup - the point of
//! reproducing a past cart is to get the past cart, not today's prices.

use tracing::info;

use crate::cart::{CartSession, CartTotals};
use crate::error::SessionResult;
use lane_core::{CartEntry, LineItem};
use lane_db::{Database, HandoffRepository};

/// Requests and consumes cart reproduction snapshots.
#[derive(Debug, Clone)]
pub struct CartReproduction {
    repo: HandoffRepository,
}

impl CartReproduction {
    pub fn new(db: &Database) -> Self {
        CartReproduction {
            repo: db.handoff(),
        }
    }

    /// Persists the given lines as the pending snapshot, replacing any
    /// earlier request. An empty selection is ignored.
    pub async fn request(&self, lines: &[LineItem]) -> SessionResult<()> {
        if lines.is_empty() {
            return Ok(());
        }
        self.repo.store(lines).await?;
        info!(lines = lines.len(), "Cart reproduction requested");
        Ok(())
    }

    /// Consumes the pending snapshot, if any, replacing the cart's contents
    /// with the restored entries. At most one caller ever gets the
    /// snapshot; everyone else gets `None` and an untouched cart.
    pub async fn consume_into(&self, cart: &CartSession) -> SessionResult<Option<CartTotals>> {
        let Some(lines) = self.repo.take().await? else {
            return Ok(None);
        };

        let entries: Vec<CartEntry> = lines
            .into_iter()
            .map(|line| CartEntry {
                barcode: line.product_barcode,
                name_snapshot: line.name_snapshot,
                unit_price_snapshot: line.unit_price_snapshot,
                quantity: line.quantity,
            })
            .collect();

        let totals = cart.restore(entries);
        info!(total = %totals.total, "Cart reproduced from snapshot");
        Ok(Some(totals))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_core::Money;
    use lane_db::DbConfig;

    fn line(barcode: &str, price: i64, quantity: i64) -> LineItem {
        LineItem {
            sale_id: 7,
            product_barcode: barcode.to_string(),
            name_snapshot: format!("Product {}", barcode),
            unit_price_snapshot: Money::from_units(price),
            quantity,
        }
    }

    async fn fixture() -> (Database, CartSession, CartReproduction) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cart = CartSession::new(db.catalog());
        let reproduction = CartReproduction::new(&db);
        (db, cart, reproduction)
    }

    #[tokio::test]
    async fn test_consume_restores_snapshot_values() {
        let (_db, cart, reproduction) = fixture().await;

        reproduction
            .request(&[line("A", 100, 2), line("B", 300, 1)])
            .await
            .unwrap();

        let totals = reproduction.consume_into(&cart).await.unwrap().unwrap();
        assert_eq!(totals.entry_count, 2);
        assert_eq!(totals.total.units(), 500);

        // Snapshot values are authoritative - "A" is not even in the
        // catalog, and the restored entry still carries its old price.
        cart.with_cart(|c| {
            assert_eq!(c.entries()[0].barcode, "A");
            assert_eq!(c.entries()[0].unit_price_snapshot.units(), 100);
        });
    }

    #[tokio::test]
    async fn test_second_consume_returns_none() {
        let (_db, cart, reproduction) = fixture().await;

        reproduction.request(&[line("A", 100, 1)]).await.unwrap();

        assert!(reproduction.consume_into(&cart).await.unwrap().is_some());
        assert!(reproduction.consume_into(&cart).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_consume_replaces_existing_cart_contents() {
        let (db, cart, reproduction) = fixture().await;

        db.catalog()
            .bulk_replace(&[lane_core::Product {
                barcode: "CURRENT".to_string(),
                name: "Current Product".to_string(),
                price: Money::from_units(999),
                category: None,
            }])
            .await
            .unwrap();
        cart.scan("CURRENT").await.unwrap();

        reproduction.request(&[line("OLD", 100, 1)]).await.unwrap();
        reproduction.consume_into(&cart).await.unwrap();

        let totals = cart.totals();
        assert_eq!(totals.entry_count, 1);
        assert_eq!(totals.total.units(), 100);
    }

    #[tokio::test]
    async fn test_empty_request_is_ignored() {
        let (_db, cart, reproduction) = fixture().await;

        reproduction.request(&[]).await.unwrap();
        assert!(reproduction.consume_into(&cart).await.unwrap().is_none());
    }
}
