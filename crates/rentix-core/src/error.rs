//! # Error Types
//!
//! Business-rule errors for rentix-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rentix-core errors (this file)                                         │
//! │  └── CoreError      - business rule violations (pure, no I/O context)   │
//! │                                                                         │
//! │  rentix-db errors (separate crate)                                      │
//! │  ├── DbError        - storage tier: connectivity, constraints,          │
//! │  │                    malformed rows                                    │
//! │  └── ServiceError   - what callers see; wraps both tiers with the       │
//! │                       operation and affected id                         │
//! │                                                                         │
//! │  Flow: CoreError ──┐                                                    │
//! │                    ├──► ServiceError ──► caller                         │
//! │        DbError  ───┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, id, amounts)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::quantity::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Violations of the line-item and lifecycle rules.
///
/// These are deterministic outcomes of the checks in
/// [`crate::validation`]; nothing here involves storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Line items cannot be added to a closed transaction.
    #[error("{kind} {id} is already closed")]
    AlreadyClosed { kind: &'static str, id: i64 },

    /// Quantities are never negative.
    #[error("negative quantity ({qty}) for {kind} {id}")]
    NegativeQuantity {
        kind: &'static str,
        id: i64,
        qty: Quantity,
    },

    /// This kind deals in whole item instances.
    #[error("{kind} quantities must be whole units, got {qty}")]
    FractionalQuantity { kind: &'static str, qty: Quantity },

    /// A single add call may not carry more than the kind's per-line limit.
    ///
    /// ## When This Occurs
    /// Renting two units of the same item code in one call. Each physical
    /// instance must be added separately.
    #[error("quantity {qty} exceeds the per-line limit of {max} for a {kind}")]
    QuantityOverLimit {
        kind: &'static str,
        qty: Quantity,
        max: Quantity,
    },

    /// Not enough stock to reserve the requested quantity.
    #[error("current stock of {code} is not enough: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: Quantity,
        requested: Quantity,
    },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            code: "CAM-1".to_string(),
            available: Quantity::from_units(3),
            requested: Quantity::from_units(5),
        };
        assert_eq!(
            err.to_string(),
            "current stock of CAM-1 is not enough: available 3.000, requested 5.000"
        );

        let err = CoreError::AlreadyClosed { kind: "sale", id: 7 };
        assert_eq!(err.to_string(), "sale 7 is already closed");
    }
}
