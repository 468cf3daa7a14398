//! # Cart Accumulator
//!
//! The in-progress, not-yet-committed set of scanned items for one customer.
//!
//! ## Operations Flow
//! ```text
//! accepted scan ───► add_product()      entry exists? qty+1 : push qty 1
//! +/- button    ───► adjust_quantity()  result <= 0 removes the entry
//! checkout      ───► checkout_lines()   barcode-ascending LineItems
//! after commit  ───► clear()
//! ```
//!
//! ## Invariants
//! - Entries are unique by barcode; display order is insertion order
//! - No entry ever persists with quantity <= 0
//! - `total()` is recomputed from the entries on every call - there is no
//!   cached total to drift

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{LineItem, Product};

/// An item in the cart.
///
/// Name and price are frozen copies of the catalog data at scan time, so the
/// register displays consistent values even if the catalog is re-imported
/// mid-transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub barcode: String,

    /// Product name at scan time (frozen).
    pub name_snapshot: String,

    /// Unit price at scan time (frozen).
    pub unit_price_snapshot: Money,

    /// Always >= 1 while the entry exists.
    pub quantity: i64,
}

impl CartEntry {
    /// Creates a quantity-1 entry snapshotting the product's current data.
    pub fn from_product(product: &Product) -> Self {
        CartEntry {
            barcode: product.barcode.clone(),
            name_snapshot: product.name.clone(),
            unit_price_snapshot: product.price,
            quantity: 1,
        }
    }

    /// Line total: frozen unit price times quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price_snapshot.multiply_quantity(self.quantity)
    }
}

/// The cart accumulator.
///
/// Owned by exactly one session at a time; lane-session serializes access
/// behind a single mutex, so the methods here can stay simple `&mut self`
/// state transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds a product: increments the existing entry or pushes a new
    /// quantity-1 entry with a fresh snapshot.
    pub fn add_product(&mut self, product: &Product) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.barcode == product.barcode)
        {
            entry.quantity += 1;
            return;
        }
        self.entries.push(CartEntry::from_product(product));
    }

    /// Applies a relative quantity change to an entry.
    ///
    /// A result of zero or less removes the entry. An absent barcode is a
    /// no-op - the +/- buttons can race a removal and must not fail.
    pub fn adjust_quantity(&mut self, barcode: &str, delta: i64) {
        if let Some(index) = self.entries.iter().position(|e| e.barcode == barcode) {
            let new_quantity = self.entries[index].quantity + delta;
            if new_quantity > 0 {
                self.entries[index].quantity = new_quantity;
            } else {
                self.entries.remove(index);
            }
        }
    }

    /// Empties the cart unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replaces the cart contents wholesale (cart reproduction).
    pub fn restore(&mut self, entries: Vec<CartEntry>) {
        self.entries = entries;
    }

    /// Current entries in insertion order.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Total quantity across all entries.
    pub fn total_quantity(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Cart total, recomputed from the entries every call.
    pub fn total(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Builds the line items for checkout, ordered by barcode ascending.
    ///
    /// The cart itself keeps scan order for display; commit re-sorts so the
    /// persisted line order is a deterministic function of the contents, not
    /// of who scanned what first. `sale_id` is left unbound at zero - the
    /// commit transaction stamps the real id.
    pub fn checkout_lines(&self) -> Vec<LineItem> {
        let mut lines: Vec<LineItem> = self
            .entries
            .iter()
            .map(|entry| LineItem {
                sale_id: 0,
                product_barcode: entry.barcode.clone(),
                name_snapshot: entry.name_snapshot.clone(),
                unit_price_snapshot: entry.unit_price_snapshot,
                quantity: entry.quantity,
            })
            .collect();
        lines.sort_by(|a, b| a.product_barcode.cmp(&b.product_barcode));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(barcode: &str, price: i64) -> Product {
        Product {
            barcode: barcode.to_string(),
            name: format!("Product {}", barcode),
            price: Money::from_units(price),
            category: None,
        }
    }

    /// Total always equals the sum over entries, checked after every
    /// mutation in a mixed scan/adjust sequence.
    #[test]
    fn test_total_never_drifts() {
        let mut cart = Cart::new();
        let a = product("A", 100);
        let b = product("B", 300);

        let assert_consistent = |cart: &Cart| {
            let expected: Money = cart
                .entries()
                .iter()
                .map(|e| e.unit_price_snapshot.multiply_quantity(e.quantity))
                .sum();
            assert_eq!(cart.total(), expected);
        };

        cart.add_product(&a);
        assert_consistent(&cart);
        cart.add_product(&a);
        assert_consistent(&cart);
        cart.add_product(&b);
        assert_consistent(&cart);
        cart.adjust_quantity("A", 3);
        assert_consistent(&cart);
        cart.adjust_quantity("B", -1);
        assert_consistent(&cart);
        cart.adjust_quantity("A", -5);
        assert_consistent(&cart);

        assert_eq!(cart.total(), Money::zero());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_same_product_increments() {
        let mut cart = Cart::new();
        let a = product("A", 100);

        cart.add_product(&a);
        cart.add_product(&a);

        assert_eq!(cart.entry_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total().units(), 200);
    }

    #[test]
    fn test_adjust_to_zero_removes_entry() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 100));
        cart.adjust_quantity("A", -1);

        assert!(cart.is_empty());
        // Removing again is a no-op, not an error.
        cart.adjust_quantity("A", -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adjust_absent_barcode_is_noop() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 100));
        cart.adjust_quantity("ZZZ", 5);

        assert_eq!(cart.entry_count(), 1);
        assert_eq!(cart.total_quantity(), 1);
    }

    #[test]
    fn test_snapshot_survives_catalog_change() {
        let mut cart = Cart::new();
        let before = product("A", 100);
        cart.add_product(&before);

        // The catalog price changed after the scan; the cart keeps the
        // snapshot it took.
        let after = product("A", 999);
        cart.add_product(&after);

        assert_eq!(cart.entries()[0].unit_price_snapshot.units(), 100);
        assert_eq!(cart.total().units(), 200);
    }

    #[test]
    fn test_checkout_lines_sorted_by_barcode() {
        let mut cart = Cart::new();
        // Scan order: B first, then A.
        cart.add_product(&product("B", 300));
        cart.add_product(&product("A", 100));
        cart.add_product(&product("A", 100));

        let lines = cart.checkout_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_barcode, "A");
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].product_barcode, "B");
        assert_eq!(lines[1].quantity, 1);
        // sale_id stays unbound until the commit transaction stamps it.
        assert!(lines.iter().all(|l| l.sale_id == 0));
    }

    #[test]
    fn test_restore_replaces_contents() {
        let mut cart = Cart::new();
        cart.add_product(&product("A", 100));

        cart.restore(vec![CartEntry {
            barcode: "B".to_string(),
            name_snapshot: "Old Name".to_string(),
            unit_price_snapshot: Money::from_units(250),
            quantity: 2,
        }]);

        assert_eq!(cart.entry_count(), 1);
        assert_eq!(cart.entries()[0].barcode, "B");
        assert_eq!(cart.total().units(), 500);
    }
}
