//! # Overdue Penalty
//!
//! Late-return penalty math for rentals.
//!
//! ## The Two-Step Escalation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   due date D          D + 7 days (hard limit)                           │
//! │       │                     │                                           │
//! │  ─────┼─────────────────────┼──────────────────────►  time              │
//! │       │                     │                                           │
//! │  penalty = 0   penalty = 50% of each   penalty = full retail value      │
//! │                line's subtotal         minus what the rental fee        │
//! │                                        already charged, per line        │
//! │                                                                         │
//! │  Past the hard limit the customer has effectively bought the item:      │
//! │  fee paid + penalty = price × qty.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The penalty is a pure function of the rental's lines, its due date, and
//! the evaluation date the caller supplies. Nothing is persisted; query it
//! whenever a number is needed.

use chrono::Days;

use crate::money::Money;
use crate::types::{RentalKind, Transaction};
use crate::{LATE_FEE_BPS, PENALTY_GRACE_DAYS};

impl Transaction<RentalKind> {
    /// Computes the overdue penalty as of `today`.
    ///
    /// - on or before the due date: zero;
    /// - within the seven-day grace window after it: 50% of each line's
    ///   subtotal;
    /// - past the hard limit: each line's full retail value minus its
    ///   subtotal.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use rentix_core::money::Money;
    /// use rentix_core::quantity::Quantity;
    /// use rentix_core::types::{Product, Rental, RentalKind, TransactionKind};
    ///
    /// let due = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    /// let mut rental = Rental::new(1, due, RentalKind::ext_for_new(due));
    /// rental.append_line(
    ///     Product {
    ///         id: 1,
    ///         code: "CAM-1".into(),
    ///         description: "camera".into(),
    ///         price: Money::from_cents(1000),
    ///         stock: Quantity::from_units(1),
    ///     },
    ///     Quantity::ONE,
    /// );
    ///
    /// // subtotal is 20% of €10.00 = €2.00
    /// assert_eq!(rental.penalty(due).cents(), 0);
    /// ```
    pub fn penalty(&self, today: chrono::NaiveDate) -> Money {
        let due = self.due_date();
        if today <= due {
            return Money::zero();
        }

        let hard_limit = due + Days::new(PENALTY_GRACE_DAYS);

        self.lines().iter().fold(Money::zero(), |acc, line| {
            let line_penalty = if today > hard_limit {
                line.product().price.mul_quantity(line.qty()) - line.subtotal()
            } else {
                line.subtotal().percent_bps(LATE_FEE_BPS)
            };
            acc + line_penalty
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantity::Quantity;
    use crate::types::{Product, Rental, RentalKind, TransactionKind};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product(id: i64, code: &str, price_cents: i64) -> Product {
        Product {
            id,
            code: code.to_string(),
            description: format!("test product {code}"),
            price: Money::from_cents(price_cents),
            stock: Quantity::from_units(10),
        }
    }

    /// Three single-unit lines with retail prices summing to €131.00.
    /// Fees (20%) sum to €26.20.
    fn overdue_rental(due: NaiveDate) -> Rental {
        let mut rental = Rental::new(1, date(2026, 3, 1), RentalKind::ext_for_new(due));
        rental.append_line(product(1, "CAM-1", 3500), Quantity::ONE);
        rental.append_line(product(2, "LENS-2", 4100), Quantity::ONE);
        rental.append_line(product(3, "TRIPOD-3", 5500), Quantity::ONE);
        rental
    }

    #[test]
    fn test_no_penalty_on_or_before_due_date() {
        let due = date(2026, 3, 10);
        let rental = overdue_rental(due);

        assert_eq!(rental.penalty(date(2026, 3, 5)).cents(), 0);
        assert_eq!(rental.penalty(due).cents(), 0);
    }

    #[test]
    fn test_half_fee_penalty_inside_grace_window() {
        let due = date(2026, 3, 10);
        let rental = overdue_rental(due);

        // day after the due date through the hard limit itself
        assert_eq!(rental.penalty(date(2026, 3, 11)).cents(), 1310);
        assert_eq!(rental.penalty(date(2026, 3, 17)).cents(), 1310);
    }

    #[test]
    fn test_full_value_penalty_past_hard_limit() {
        let due = date(2026, 3, 10);
        let rental = overdue_rental(due);

        // first day past due + 7: retail 13100 minus fees 2620
        assert_eq!(rental.penalty(date(2026, 3, 18)).cents(), 10480);
        // and it stays there
        assert_eq!(rental.penalty(date(2026, 4, 30)).cents(), 10480);
    }

    #[test]
    fn test_single_line_boundary_values() {
        // price €10.00, qty 1 → subtotal (fee) €2.00
        let due = date(2026, 6, 1);
        let mut rental = Rental::new(2, date(2026, 5, 20), RentalKind::ext_for_new(due));
        rental.append_line(product(1, "CAM-1", 1000), Quantity::ONE);
        assert_eq!(rental.total().cents(), 200);

        assert_eq!(rental.penalty(due).cents(), 0); // on time
        assert_eq!(rental.penalty(date(2026, 6, 2)).cents(), 100); // 50% of fee
        assert_eq!(rental.penalty(date(2026, 6, 8)).cents(), 100); // hard limit day
        assert_eq!(rental.penalty(date(2026, 6, 9)).cents(), 800); // 1000 − 200
    }

    #[test]
    fn test_penalty_of_empty_rental_is_zero() {
        let due = date(2026, 3, 10);
        let rental = Rental::new(3, date(2026, 3, 1), RentalKind::ext_for_new(due));
        assert_eq!(rental.penalty(date(2026, 4, 1)).cents(), 0);
    }
}
