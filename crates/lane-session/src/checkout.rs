//! # Checkout Coordinator
//!
//! Transforms a finalized cart plus tender into a durable sale.
//!
//! ## Contract
//! - Empty cart and short tender are rejected before anything touches
//!   storage. The UI disables the checkout button in both cases; the engine
//!   still refuses.
//! - The write is a single transaction: header and lines land together or
//!   not at all.
//! - The coordinator's side effects are storage-scoped. Clearing the cart
//!   after a successful commit is the caller's move, which keeps a failed
//!   commit from eating the customer's cart.

use chrono::Utc;
use tracing::info;

use crate::cart::CartSession;
use crate::error::SessionResult;
use lane_core::{CoreError, Money, Sale};
use lane_db::{Database, SaleRepository, TerminalRepository};

/// Coordinates the atomic sale commit.
#[derive(Debug, Clone)]
pub struct CheckoutCoordinator {
    sales: SaleRepository,
    terminal: TerminalRepository,
}

impl CheckoutCoordinator {
    pub fn new(db: &Database) -> Self {
        CheckoutCoordinator {
            sales: db.sales(),
            terminal: db.terminal(),
        }
    }

    /// Commits the cart as a sale and returns the persisted header.
    ///
    /// Lines are persisted barcode-ascending regardless of scan order. On
    /// any error nothing is persisted and the cart is untouched.
    pub async fn commit(
        &self,
        cart: &CartSession,
        tendered: Money,
        payment_method: &str,
    ) -> SessionResult<Sale> {
        let (lines, total) = cart.with_cart(|c| (c.checkout_lines(), c.total()));

        if lines.is_empty() {
            return Err(CoreError::EmptyCartCommit.into());
        }

        let change = tendered - total;
        if change.is_negative() {
            return Err(CoreError::InsufficientTender { tendered, total }.into());
        }

        let terminal_id = self.terminal.get_or_create_id().await?;

        let sale = Sale {
            id: 0,
            terminal_id,
            created_at: Utc::now(),
            payment_method: payment_method.to_string(),
            total_amount: total,
            tendered_amount: tendered,
            change_amount: change,
            is_cancelled: false,
        };

        let committed = self.sales.insert_sale_with_lines(&sale, &lines).await?;

        info!(
            sale_id = committed.id,
            total = %committed.total_amount,
            change = %committed.change_amount,
            method = payment_method,
            "Checkout complete"
        );

        Ok(committed)
    }
}
