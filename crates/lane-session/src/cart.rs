//! # Cart Session
//!
//! Owns the live cart for the current customer and serializes every access
//! behind one mutex - the cart is strictly single-writer, and locking the
//! whole thing is what prevents a lost update when a scan callback and a
//! +/- button interleave.
//!
//! ```text
//! accepted scan ───► scan()              catalog lookup, then entry +1
//! +/- button    ───► adjust_quantity()
//! clear button  ───► clear()
//! handoff       ───► restore()           replaces the whole cart
//! ```

use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

use crate::error::SessionResult;
use lane_core::{Cart, CartEntry, CoreError, Money};
use lane_db::CatalogRepository;

/// Cart totals summary handed back after every mutation, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    pub entry_count: usize,
    pub total_quantity: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            entry_count: cart.entry_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
        }
    }
}

/// The active cart, bound to one catalog.
///
/// Shared between the UI task and the scan worker; all mutation funnels
/// through the internal mutex.
#[derive(Debug)]
pub struct CartSession {
    catalog: CatalogRepository,
    cart: Mutex<Cart>,
}

impl CartSession {
    pub fn new(catalog: CatalogRepository) -> Self {
        CartSession {
            catalog,
            cart: Mutex::new(Cart::new()),
        }
    }

    /// Handles an accepted scan: looks the barcode up in the catalog and
    /// adds the product to the cart.
    ///
    /// An unregistered barcode returns [`CoreError::ProductNotFound`] and
    /// leaves the cart untouched - that is operator feedback, not a fault.
    pub async fn scan(&self, barcode: &str) -> SessionResult<CartTotals> {
        let product = self
            .catalog
            .find_by_barcode(barcode)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(barcode.to_string()))?;

        debug!(barcode, price = %product.price, "Scan accepted into cart");

        Ok(self.with_cart_mut(|cart| {
            cart.add_product(&product);
            CartTotals::from(&*cart)
        }))
    }

    /// Applies a relative quantity change; a result of zero removes the
    /// entry, an unknown barcode is a no-op.
    pub fn adjust_quantity(&self, barcode: &str, delta: i64) -> CartTotals {
        self.with_cart_mut(|cart| {
            cart.adjust_quantity(barcode, delta);
            CartTotals::from(&*cart)
        })
    }

    /// Empties the cart.
    pub fn clear(&self) {
        self.with_cart_mut(|cart| cart.clear());
    }

    /// Replaces the cart contents with restored entries (cart reproduction).
    pub fn restore(&self, entries: Vec<CartEntry>) -> CartTotals {
        self.with_cart_mut(|cart| {
            cart.restore(entries);
            CartTotals::from(&*cart)
        })
    }

    /// Current totals.
    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| CartTotals::from(cart))
    }

    /// Runs a closure with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("cart mutex poisoned");
        f(&cart)
    }

    /// Runs a closure with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart)
    }
}
