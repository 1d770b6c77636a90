//! # Quantity Module
//!
//! Fixed-point quantities in thousandths of a unit.
//!
//! One type serves every place an amount of product appears:
//! sale quantities (fractional: 2.5 kg of something is a valid sale),
//! rental quantities (whole instances of an item), stock levels, and the
//! signed deltas passed to stock adjustment (negative = consumption,
//! positive = return). Keeping them all in the same integer scale means
//! a stock comparison against a line quantity is a plain integer compare.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Number of milli-units in one whole unit.
const MILLIS_PER_UNIT: i64 = 1000;

/// A fixed-point amount of product, in thousandths of a unit.
///
/// ## Example
/// ```rust
/// use rentix_core::quantity::Quantity;
///
/// let two_and_a_half = Quantity::from_millis(2_500);
/// assert!(!two_and_a_half.is_whole());
///
/// let three = Quantity::from_units(3);
/// assert!(three.is_whole());
/// assert_eq!(three.millis(), 3_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Quantity(i64);

impl Quantity {
    /// No product at all.
    pub const ZERO: Quantity = Quantity(0);

    /// Exactly one unit.
    pub const ONE: Quantity = Quantity(MILLIS_PER_UNIT);

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLIS_PER_UNIT)
    }

    /// Creates a quantity from milli-units (thousandths of a unit).
    ///
    /// This is also the raw representation persisted in the `qty` columns.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Quantity(millis)
    }

    /// Returns the raw milli-unit count.
    #[inline]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    /// Checks if the amount is below zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checks if the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the amount is an exact number of whole units.
    ///
    /// Rentals deal in physical item instances, so their line quantities
    /// must satisfy this; sales do not care.
    #[inline]
    pub const fn is_whole(&self) -> bool {
        self.0 % MILLIS_PER_UNIT == 0
    }
}

/// Display prints the unit amount with three decimal places: `2.500`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:03}",
            sign,
            (self.0 / MILLIS_PER_UNIT).abs(),
            (self.0 % MILLIS_PER_UNIT).abs()
        )
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

/// Negation turns a consumption delta into a return delta and back.
impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(-self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Quantity::from_units(2).millis(), 2_000);
        assert_eq!(Quantity::from_millis(250).millis(), 250);
        assert_eq!(Quantity::ONE, Quantity::from_units(1));
        assert_eq!(Quantity::ZERO.millis(), 0);
    }

    #[test]
    fn test_whole_and_sign_checks() {
        assert!(Quantity::from_units(5).is_whole());
        assert!(!Quantity::from_millis(1_500).is_whole());
        assert!(Quantity::from_millis(-1).is_negative());
        assert!(!Quantity::ZERO.is_negative());
        assert!(Quantity::ZERO.is_zero());
        assert!(Quantity::ZERO.is_whole());
    }

    #[test]
    fn test_arithmetic_and_ordering() {
        let a = Quantity::from_units(3);
        let b = Quantity::from_millis(500);

        assert_eq!((a + b).millis(), 3_500);
        assert_eq!((a - b).millis(), 2_500);
        assert_eq!((-b).millis(), -500);
        assert!(b < a);
        assert!(Quantity::from_millis(-1) < Quantity::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Quantity::from_millis(2_500)), "2.500");
        assert_eq!(format!("{}", Quantity::from_units(1)), "1.000");
        assert_eq!(format!("{}", Quantity::from_millis(-250)), "-0.250");
    }
}
