//! # Money Module
//!
//! Monetary values as whole currency units backed by `i64`.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point:   0.1 + 0.2 = 0.30000000000000004   WRONG
//! In whole units:      100 + 200 = 300                   always exact
//! ```
//!
//! The engine deals in a currency without fractional units, so one `Money`
//! unit is one displayable unit of currency. The database, calculations and
//! exports all use the raw integer; only a UI layer would ever format it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results of `tendered - total` may be
///   negative and the sign is what the tender check inspects
/// - **Single-field tuple struct**: zero-cost abstraction over i64
/// - **Transparent sqlx type** (behind the `sqlx` feature): stored as a
///   plain INTEGER column
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the raw value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity to produce a line total.
    ///
    /// ## Example
    /// ```rust
    /// use lane_core::money::Money;
    ///
    /// let unit_price = Money::from_units(299);
    /// assert_eq!(unit_price.multiply_quantity(3).units(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Debug-friendly display with thousands separators: 1000 -> "1,000".
///
/// UI localization is out of scope; this is the format the receipts and
/// logs use.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let negative = self.0 < 0;
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if negative {
            write!(f, "-{}", grouped)
        } else {
            write!(f, "{}", grouped)
        }
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Summation over line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(1980);
        assert_eq!(money.units(), 1980);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(300);

        assert_eq!((a + b).units(), 1300);
        assert_eq!((a - b).units(), 700);
        assert_eq!(a.multiply_quantity(3).units(), 3000);
    }

    #[test]
    fn test_negative_change_is_detectable() {
        let total = Money::from_units(500);
        let tendered = Money::from_units(400);
        assert!((tendered - total).is_negative());
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300]
            .into_iter()
            .map(Money::from_units)
            .sum();
        assert_eq!(total.units(), 600);
    }

    #[test]
    fn test_display_grouping() {
        assert_eq!(format!("{}", Money::from_units(0)), "0");
        assert_eq!(format!("{}", Money::from_units(100)), "100");
        assert_eq!(format!("{}", Money::from_units(1000)), "1,000");
        assert_eq!(format!("{}", Money::from_units(1234567)), "1,234,567");
        assert_eq!(format!("{}", Money::from_units(-550)), "-550");
    }
}
