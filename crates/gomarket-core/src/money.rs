//! # Money Module
//!
//! Provides the `Money` type used for cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog prices arrive as JSON numbers:                                 │
//! │    19.9 * 3 = 59.699999999999996  ❌                                   │
//! │                                                                         │
//! │  OUR SOLUTION: Round each unit price to cents ONCE, then integers      │
//! │    1990 cents * 3 = 5970 cents = $59.70                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stored snapshot keeps `price` as the catalog number so the on-device
//! format stays unchanged. Only totals go through this type.
//!
//! ## Usage
//! ```rust
//! use gomarket_core::money::Money;
//!
//! let price = Money::from_price(19.9);
//! assert_eq!(price.cents(), 1990);
//! assert_eq!((price * 3).to_string(), "$59.70");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// CartItem.price ──► Money::from_price ──► × quantity ──► CartTotals.subtotal
///                                                              │
///                                                              ▼
///                                             "$59.70" on the FloatingCart
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a catalog price (major units, e.g. `19.9`) to cents.
    ///
    /// Rounds half away from zero to the nearest cent. Non-finite input
    /// maps to zero; validation rejects such prices before they reach a cart.
    pub fn from_price(price: f64) -> Self {
        if !price.is_finite() {
            return Money::zero();
        }
        Money((price * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies by a line-item quantity.
    ///
    /// Saturates instead of wrapping; a cart that large is already broken.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`.
///
/// ## Note
/// For debugging and logs. Screens format through `CartConfig::format_currency`
/// so the currency symbol is configurable.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().unsigned_abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
