//! # Domain Types
//!
//! Core domain types shared across the engine.
//!
//! ```text
//! ┌──────────────┐      ┌──────────────┐      ┌──────────────────┐
//! │   Product    │      │     Sale     │ 1..n │     LineItem     │
//! │ ──────────── │      │ ──────────── │◄─────│ ───────────────  │
//! │ barcode (PK) │      │ id (store-   │      │ sale_id (FK)     │
//! │ name         │      │   assigned)  │      │ product_barcode  │
//! │ price        │      │ totals       │      │ name_snapshot    │
//! │ category     │      │ is_cancelled │      │ unit_price_snap. │
//! └──────────────┘      └──────────────┘      └──────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes the product's name and price at commit time, so a
//! later catalog re-import never rewrites what a customer actually paid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry, keyed by barcode.
///
/// Created and updated only through bulk import (upsert-by-barcode); the
/// engine never deletes products outside the test reset path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Barcode string - the unique key (EAN-13, UPC-A, whatever the scanner
    /// decodes).
    pub barcode: String,

    /// Display name shown on the register and in exports.
    pub name: String,

    /// Price in whole currency units, never negative.
    pub price: Money,

    /// Optional grouping used for export enrichment.
    pub category: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A durably committed transaction header.
///
/// `id` is assigned by the store on insert and immutable afterwards. The only
/// field that ever changes is `is_cancelled`, via the reversible cancellation
/// toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    /// Store-assigned, monotonically increasing. Zero on an unsaved header.
    pub id: i64,

    /// Stable identifier of the terminal that recorded the sale.
    pub terminal_id: String,

    /// When the sale was committed.
    pub created_at: DateTime<Utc>,

    /// Free-form payment method label ("cash", "qr", ...).
    pub payment_method: String,

    /// Sum of line totals at commit time.
    pub total_amount: Money,

    /// What the customer handed over. Invariant: `tendered >= total`.
    pub tendered_amount: Money,

    /// `tendered_amount - total_amount`, never negative.
    pub change_amount: Money,

    /// Reversible cancellation flag. Cancelled sales stay in history but
    /// drop out of the active aggregate.
    pub is_cancelled: bool,
}

// =============================================================================
// LineItem
// =============================================================================

/// One product-and-quantity row belonging to a committed sale.
///
/// Immutable after creation. `sale_id` is stamped by the commit transaction,
/// not by whoever builds the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItem {
    /// Owning sale. Zero until the commit transaction assigns it.
    pub sale_id: i64,

    pub product_barcode: String,

    /// Product name at commit time (frozen).
    pub name_snapshot: String,

    /// Unit price at commit time (frozen).
    pub unit_price_snapshot: Money,

    pub quantity: i64,
}

impl LineItem {
    /// Line total: frozen unit price times quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price_snapshot.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// SaleWithLines
// =============================================================================

/// A sale header joined with its commit-ordered line items, as the history
/// and export paths consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleWithLines {
    pub sale: Sale,
    pub lines: Vec<LineItem>,
}
