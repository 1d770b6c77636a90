//! # Validation Module
//!
//! The pure rule checks behind the line-item protocol.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 add_line_item rule gauntlet                             │
//! │                                                                         │
//! │  check_new_line (this module, pure)                                     │
//! │  ├── transaction still open?                                            │
//! │  ├── quantity not negative?                                             │
//! │  └── kind rules: whole units? within per-line limit?                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  product lookup (rentix-db, I/O)                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  check_stock (this module, pure)                                        │
//! │  └── enough stock to reserve the quantity?                              │
//! │                                                                         │
//! │  Only after all of these does any write happen.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping the checks here, out of the service, means every rule is
//! testable without a database.

use crate::error::{CoreError, CoreResult};
use crate::quantity::Quantity;
use crate::types::{Product, Transaction, TransactionKind};

/// Checks everything about a prospective line item that does not require
/// the product: the transaction is open, the quantity is not negative, and
/// the kind's per-line rules hold.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use rentix_core::quantity::Quantity;
/// use rentix_core::types::Sale;
/// use rentix_core::validation::check_new_line;
///
/// let sale = Sale::new(1, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), ());
/// assert!(check_new_line(&sale, Quantity::from_units(2)).is_ok());
/// assert!(check_new_line(&sale, Quantity::from_millis(-1)).is_err());
/// ```
pub fn check_new_line<K: TransactionKind>(txn: &Transaction<K>, qty: Quantity) -> CoreResult<()> {
    if !txn.is_open() {
        return Err(CoreError::AlreadyClosed {
            kind: K::NOUN,
            id: txn.id(),
        });
    }

    if qty.is_negative() {
        return Err(CoreError::NegativeQuantity {
            kind: K::NOUN,
            id: txn.id(),
            qty,
        });
    }

    let rules = K::line_rules();

    if rules.whole_units && !qty.is_whole() {
        return Err(CoreError::FractionalQuantity { kind: K::NOUN, qty });
    }

    if let Some(max) = rules.max_per_line {
        if qty > max {
            return Err(CoreError::QuantityOverLimit {
                kind: K::NOUN,
                qty,
                max,
            });
        }
    }

    Ok(())
}

/// Checks that the product has enough stock to cover `qty`.
///
/// Zero quantity always passes (useful for storage tests, same allowance
/// the system has always made).
pub fn check_stock(product: &Product, qty: Quantity) -> CoreResult<()> {
    if product.stock < qty {
        return Err(CoreError::InsufficientStock {
            code: product.code.clone(),
            available: product.stock,
            requested: qty,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
