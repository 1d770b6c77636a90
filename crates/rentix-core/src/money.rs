//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A rental fee of 20% on €10.30 must come out the same on every          │
//! │  machine, every time, or totals drift from what was persisted.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    All arithmetic is i64 cents; scaling rounds half-up explicitly.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rentix_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // €10.99
//!
//! // Arithmetic operations
//! let total = price + Money::from_cents(500); // €15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::quantity::Quantity;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: allows negative intermediate values (refund math)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for callers that serialize records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use rentix_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents €10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a fixed-point quantity.
    ///
    /// ## Implementation
    /// Quantities carry thousandths of a unit, so the product of cents and
    /// milli-units is scaled back down by 1000 with half-up rounding:
    /// `(cents * millis + 500) / 1000`.
    ///
    /// ## Example
    /// ```rust
    /// use rentix_core::money::Money;
    /// use rentix_core::quantity::Quantity;
    ///
    /// let unit_price = Money::from_cents(299); // €2.99
    /// let line_total = unit_price.mul_quantity(Quantity::from_millis(2_500)); // 2.5 units
    /// assert_eq!(line_total.cents(), 748); // €7.475 rounds to €7.48
    /// ```
    pub fn mul_quantity(&self, qty: Quantity) -> Money {
        // i128 to prevent overflow on large amounts
        let cents = (self.0 as i128 * qty.millis() as i128 + 500) / 1000;
        Money::from_cents(cents as i64)
    }

    /// Scales the value by a rate in basis points (1 bps = 0.01%).
    ///
    /// Used for the 20% rental fee (`2000` bps) and the 50% late penalty
    /// (`5000` bps). Rounds half-up: `(cents * bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use rentix_core::money::Money;
    ///
    /// let retail = Money::from_cents(3500); // €35.00
    /// assert_eq!(retail.percent_bps(2000).cents(), 700); // 20% fee = €7.00
    /// ```
    pub fn percent_bps(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Currency/locale formatting is a
/// presentation concern and out of scope here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "€10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "€5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-€5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "€0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut acc = Money::zero();
        acc += a;
        acc += b;
        assert_eq!(acc.cents(), 1500);
    }

    #[test]
    fn test_mul_quantity_whole_units() {
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.mul_quantity(Quantity::from_units(3));
        assert_eq!(line_total.cents(), 897);
    }

    #[test]
    fn test_mul_quantity_fractional_rounds_half_up() {
        // €2.99 × 2.5 = €7.475 → €7.48
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.mul_quantity(Quantity::from_millis(2_500));
        assert_eq!(line_total.cents(), 748);

        // €0.01 × 0.049 = 0.049¢ → 0¢
        let tiny = Money::from_cents(1).mul_quantity(Quantity::from_millis(49));
        assert_eq!(tiny.cents(), 0);
    }

    #[test]
    fn test_percent_bps() {
        // 20% rental fee on €35.00 = €7.00
        assert_eq!(Money::from_cents(3500).percent_bps(2000).cents(), 700);
        // 50% late penalty on €26.20 = €13.10
        assert_eq!(Money::from_cents(2620).percent_bps(5000).cents(), 1310);
        // rounding: 8.25% of €10.00 = €0.825 → €0.83
        assert_eq!(Money::from_cents(1000).percent_bps(825).cents(), 83);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }
}
