//! # rentix-core: Pure Business Logic for rentix
//!
//! This crate is the **heart** of rentix. It contains all business logic as
//! pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        rentix Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                 Clients (CLI / tests / future UI)               │    │
//! │  │      open ──► add_line_item ──► close ──► fetch/penalty         │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │          rentix-db: TransactionService + repositories           │    │
//! │  │        SQLite queries, migrations, entity cache coherence       │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ rentix-core (THIS CRATE) ★                      │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌────────────┐      │    │
//! │  │   │   types   │ │   money   │ │ quantity  │ │ validation │      │    │
//! │  │   │ Product   │ │   Money   │ │ Quantity  │ │   rules    │      │    │
//! │  │   │ Txn<Kind> │ │  (cents)  │ │ (millis)  │ │   checks   │      │    │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └────────────┘      │    │
//! │  │                        ┌───────────┐                            │    │
//! │  │                        │  penalty  │                            │    │
//! │  │                        └───────────┘                            │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Transaction, LineItem, kinds)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Fixed-point product amounts (thousandths of a unit)
//! - [`validation`] - Line-item business rule checks
//! - [`penalty`] - Overdue-rental penalty calculation
//! - [`error`] - Business rule error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - same input = same output
//! 2. **No I/O**: database, network, and even the system clock are FORBIDDEN here;
//!    evaluation dates are always passed in
//! 3. **Integer Math**: cents for money, milli-units for quantities
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod penalty;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use rentix_core::Money` instead of
// `use rentix_core::money::Money`

pub use error::{CoreError, CoreResult};
pub use money::Money;
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rental fee rate in basis points: a rental line's subtotal is 20% of the
/// item's retail value.
///
/// ## Why a constant?
/// Two historical fee formulas existed (full retail vs. 20% of retail).
/// The 20% rate is the one whose penalty figures match the accepted
/// accounting expectations, so it is pinned here rather than configurable.
pub const RENTAL_FEE_BPS: u32 = 2000;

/// Late-return penalty rate inside the grace window, in basis points:
/// 50% of each line's subtotal.
pub const LATE_FEE_BPS: u32 = 5000;

/// Days past the due date before the penalty escalates from a share of the
/// fee to the item's full retail value.
pub const PENALTY_GRACE_DAYS: u64 = 7;
