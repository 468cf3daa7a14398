//! # Ledger Feed
//!
//! The read side of the sales ledger: a continuously updated view of all
//! sales (newest first) plus the running total of the non-cancelled ones,
//! delivered over a `tokio::sync::watch` channel.
//!
//! ## Push, Not Pull
//! Every mutation that goes through the feed - a fresh commit, a
//! cancellation, a reinstatement, a reset - re-reads the ledger, recomputes
//! the aggregate and publishes a new view. Subscribers see each state
//! change; they never poll.

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

use crate::error::SessionResult;
use lane_core::{Money, Sale};
use lane_db::SaleRepository;

/// One published state of the ledger.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LedgerView {
    /// All sales, newest first, cancelled ones included.
    pub sales: Vec<Sale>,

    /// Sum of `total_amount` over sales with `is_cancelled == false`.
    pub active_total: Money,
}

impl LedgerView {
    fn from_sales(sales: Vec<Sale>) -> Self {
        let active_total = sales
            .iter()
            .filter(|s| !s.is_cancelled)
            .map(|s| s.total_amount)
            .sum();
        LedgerView {
            sales,
            active_total,
        }
    }
}

/// Owns the watch channel and the mutations that feed it.
#[derive(Debug)]
pub struct LedgerFeed {
    sales: SaleRepository,
    tx: watch::Sender<LedgerView>,
}

impl LedgerFeed {
    /// Loads the current ledger state and opens the feed.
    pub async fn new(sales: SaleRepository) -> SessionResult<Self> {
        let initial = Self::load(&sales).await?;
        let (tx, _) = watch::channel(initial);
        Ok(LedgerFeed { sales, tx })
    }

    /// Subscribes to ledger updates. The receiver immediately holds the
    /// latest view.
    pub fn subscribe(&self) -> watch::Receiver<LedgerView> {
        self.tx.subscribe()
    }

    /// The latest published view.
    pub fn current(&self) -> LedgerView {
        self.tx.borrow().clone()
    }

    /// Re-reads the ledger and publishes a fresh view. Call after any
    /// mutation that bypasses the feed (e.g. a checkout commit).
    pub async fn refresh(&self) -> SessionResult<()> {
        let view = Self::load(&self.sales).await?;
        debug!(
            sales = view.sales.len(),
            active_total = %view.active_total,
            "Publishing ledger view"
        );
        self.tx.send_replace(view);
        Ok(())
    }

    /// Cancels a sale and publishes the recomputed view.
    pub async fn cancel_sale(&self, sale_id: i64) -> SessionResult<()> {
        self.sales.cancel(sale_id).await?;
        self.refresh().await
    }

    /// Reverses a cancellation and publishes the recomputed view.
    pub async fn uncancel_sale(&self, sale_id: i64) -> SessionResult<()> {
        self.sales.uncancel(sale_id).await?;
        self.refresh().await
    }

    async fn load(sales: &SaleRepository) -> SessionResult<LedgerView> {
        Ok(LedgerView::from_sales(sales.all_sales().await?))
    }
}
