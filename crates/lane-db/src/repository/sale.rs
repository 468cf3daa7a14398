//! # Sale Repository
//!
//! The durable ledger: atomic sale commit, the reversible cancellation
//! toggle, and the reads behind history and export.
//!
//! ## Commit Protocol
//! ```text
//! BEGIN
//!   1. INSERT sale header            → store assigns the id
//!   2. stamp that id on every line
//!   3. INSERT all line items
//! COMMIT                             → all visible, or (on any failure)
//! ROLLBACK                           → none visible
//! ```
//!
//! A reader can never observe a sale without its lines or lines without
//! their sale.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use lane_core::{LineItem, Sale, SaleWithLines};

/// Repository for ledger operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a sale header and its line items in one transaction.
    ///
    /// The incoming header's id is ignored; the store assigns the next id
    /// and stamps it onto every line. Returns the header as persisted.
    pub async fn insert_sale_with_lines(
        &self,
        sale: &Sale,
        lines: &[LineItem],
    ) -> DbResult<Sale> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO sales (
                 terminal_id, created_at, payment_method,
                 total_amount, tendered_amount, change_amount, is_cancelled
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&sale.terminal_id)
        .bind(sale.created_at)
        .bind(&sale.payment_method)
        .bind(sale.total_amount)
        .bind(sale.tendered_amount)
        .bind(sale.change_amount)
        .bind(sale.is_cancelled)
        .execute(&mut *tx)
        .await?;

        let sale_id = result.last_insert_rowid();

        for line in lines {
            sqlx::query(
                "INSERT INTO sale_lines (
                     sale_id, product_barcode, name_snapshot,
                     unit_price_snapshot, quantity
                 ) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(sale_id)
            .bind(&line.product_barcode)
            .bind(&line.name_snapshot)
            .bind(line.unit_price_snapshot)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            sale_id,
            total = %sale.total_amount,
            lines = lines.len(),
            "Sale committed"
        );

        Ok(Sale {
            id: sale_id,
            ..sale.clone()
        })
    }

    /// All sales, newest first. Id is the tie-break so two sales in the same
    /// second still come back in commit order.
    pub async fn all_sales(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, terminal_id, created_at, payment_method,
                    total_amount, tendered_amount, change_amount, is_cancelled
             FROM sales
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sales committed within the given window, newest first.
    pub async fn sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, terminal_id, created_at, payment_method,
                    total_amount, tendered_amount, change_amount, is_cancelled
             FROM sales
             WHERE created_at BETWEEN ?1 AND ?2
             ORDER BY created_at DESC, id DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Line items for one sale, in commit order (barcode ascending).
    pub async fn lines_for_sale(&self, sale_id: i64) -> DbResult<Vec<LineItem>> {
        let lines = sqlx::query_as::<_, LineItem>(
            "SELECT sale_id, product_barcode, name_snapshot, unit_price_snapshot, quantity
             FROM sale_lines
             WHERE sale_id = ?1
             ORDER BY product_barcode ASC",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// All sales joined with their lines, newest sale first, for export.
    pub async fn sales_with_lines(&self) -> DbResult<Vec<SaleWithLines>> {
        let sales = self.all_sales().await?;

        let all_lines = sqlx::query_as::<_, LineItem>(
            "SELECT sale_id, product_barcode, name_snapshot, unit_price_snapshot, quantity
             FROM sale_lines
             ORDER BY sale_id, product_barcode ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_sale: std::collections::HashMap<i64, Vec<LineItem>> =
            std::collections::HashMap::new();
        for line in all_lines {
            by_sale.entry(line.sale_id).or_default().push(line);
        }

        Ok(sales
            .into_iter()
            .map(|sale| {
                let lines = by_sale.remove(&sale.id).unwrap_or_default();
                SaleWithLines { sale, lines }
            })
            .collect())
    }

    /// Marks a sale cancelled. Idempotent: cancelling twice leaves it
    /// cancelled. Unknown ids are an error.
    pub async fn cancel(&self, sale_id: i64) -> DbResult<()> {
        debug!(sale_id, "Cancelling sale");
        self.set_cancelled(sale_id, true).await
    }

    /// Reverses a cancellation. Idempotent in the same way.
    pub async fn uncancel(&self, sale_id: i64) -> DbResult<()> {
        debug!(sale_id, "Reinstating sale");
        self.set_cancelled(sale_id, false).await
    }

    async fn set_cancelled(&self, sale_id: i64, cancelled: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales SET is_cancelled = ?2 WHERE id = ?1")
            .bind(sale_id)
            .bind(cancelled)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }

    /// Deletes one sale; the schema cascade removes its lines. Test/reset
    /// path only - sales are never deleted in normal operation.
    pub async fn delete_sale(&self, sale_id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }

    /// Removes the entire ledger. Test/reset path only.
    pub async fn clear_all(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM sales").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use lane_core::Money;

    fn header(total: i64, tendered: i64) -> Sale {
        Sale {
            id: 0,
            terminal_id: "term-1".to_string(),
            created_at: Utc::now(),
            payment_method: "cash".to_string(),
            total_amount: Money::from_units(total),
            tendered_amount: Money::from_units(tendered),
            change_amount: Money::from_units(tendered - total),
            is_cancelled: false,
        }
    }

    fn line(barcode: &str, price: i64, quantity: i64) -> LineItem {
        LineItem {
            sale_id: 0,
            product_barcode: barcode.to_string(),
            name_snapshot: format!("Product {}", barcode),
            unit_price_snapshot: Money::from_units(price),
            quantity,
        }
    }

    async fn test_db() -> Database {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_commit_assigns_id_and_stamps_lines() {
        let db = test_db().await;
        let sales = db.sales();

        let committed = sales
            .insert_sale_with_lines(&header(500, 600), &[line("A", 100, 2), line("B", 300, 1)])
            .await
            .unwrap();

        assert!(committed.id > 0);

        let lines = sales.lines_for_sale(committed.id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.sale_id == committed.id));
        assert_eq!(lines[0].product_barcode, "A");
        assert_eq!(lines[1].product_barcode, "B");
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_nothing_behind() {
        let db = test_db().await;
        let sales = db.sales();

        // Duplicate barcode violates the (sale_id, barcode) primary key on
        // the second line insert, after the header already went in.
        let result = sales
            .insert_sale_with_lines(&header(200, 200), &[line("A", 100, 1), line("A", 100, 1)])
            .await;
        assert!(result.is_err());

        // The rollback must have taken the header with it.
        assert!(sales.all_sales().await.unwrap().is_empty());
        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_all_sales_newest_first() {
        let db = test_db().await;
        let sales = db.sales();

        let first = sales
            .insert_sale_with_lines(&header(100, 100), &[line("A", 100, 1)])
            .await
            .unwrap();
        let second = sales
            .insert_sale_with_lines(&header(300, 300), &[line("B", 300, 1)])
            .await
            .unwrap();

        let all = sales.all_sales().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
        // Ids assigned by the store increase monotonically.
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_cancel_toggle_is_idempotent() {
        let db = test_db().await;
        let sales = db.sales();

        let sale = sales
            .insert_sale_with_lines(&header(100, 100), &[line("A", 100, 1)])
            .await
            .unwrap();

        sales.cancel(sale.id).await.unwrap();
        sales.cancel(sale.id).await.unwrap();
        assert!(sales.all_sales().await.unwrap()[0].is_cancelled);

        sales.uncancel(sale.id).await.unwrap();
        sales.uncancel(sale.id).await.unwrap();
        assert!(!sales.all_sales().await.unwrap()[0].is_cancelled);
    }

    #[tokio::test]
    async fn test_cancel_unknown_sale_is_not_found() {
        let db = test_db().await;
        let result = db.sales().cancel(9999).await;
        assert!(matches!(result, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_cascades_to_lines() {
        let db = test_db().await;
        let sales = db.sales();

        let sale = sales
            .insert_sale_with_lines(&header(500, 500), &[line("A", 100, 2), line("B", 300, 1)])
            .await
            .unwrap();

        sales.delete_sale(sale.id).await.unwrap();

        let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_sales_with_lines_groups_by_sale() {
        let db = test_db().await;
        let sales = db.sales();

        let s1 = sales
            .insert_sale_with_lines(&header(200, 200), &[line("A", 100, 2)])
            .await
            .unwrap();
        let s2 = sales
            .insert_sale_with_lines(&header(300, 500), &[line("B", 300, 1), line("C", 0, 1)])
            .await
            .unwrap();

        let joined = sales.sales_with_lines().await.unwrap();
        assert_eq!(joined.len(), 2);
        // Newest first.
        assert_eq!(joined[0].sale.id, s2.id);
        assert_eq!(joined[0].lines.len(), 2);
        assert_eq!(joined[1].sale.id, s1.id);
        assert_eq!(joined[1].lines.len(), 1);
    }

    #[tokio::test]
    async fn test_sales_between_filters_window() {
        let db = test_db().await;
        let sales = db.sales();

        let committed = sales
            .insert_sale_with_lines(&header(100, 100), &[line("A", 100, 1)])
            .await
            .unwrap();

        let now = Utc::now();
        let in_window = sales
            .sales_between(now - chrono::Duration::hours(1), now)
            .await
            .unwrap();
        assert_eq!(in_window.len(), 1);
        assert_eq!(in_window[0].id, committed.id);

        let out_of_window = sales
            .sales_between(now - chrono::Duration::hours(2), now - chrono::Duration::hours(1))
            .await
            .unwrap();
        assert!(out_of_window.is_empty());
    }
}
