//! # Domain Types
//!
//! Core domain types used throughout rentix.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐   │
//! │  │    Product      │   │  Transaction<K>      │   │   LineItem<K>   │   │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │   │
//! │  │  id             │   │  id                  │   │  id             │   │
//! │  │  code           │   │  opened_on           │   │  product        │   │
//! │  │  description    │   │  status (O/C)        │   │  qty            │   │
//! │  │  price          │   │  lines               │   │                 │   │
//! │  │  stock          │   │  ext: K::Ext         │   │                 │   │
//! │  └─────────────────┘   └──────────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  K is a TransactionKind: SaleKind or RentalKind. The kind decides the   │
//! │  per-line rules and the subtotal formula; RentalKind also hangs the     │
//! │  due date and the return axis off the transaction via its Ext type.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales and rentals share one parameterized `Transaction` type instead of
//! two parallel class hierarchies; everything kind-specific goes through
//! the small [`TransactionKind`] strategy trait.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::money::Money;
use crate::quantity::Quantity;
use crate::RENTAL_FEE_BPS;

// =============================================================================
// Product
// =============================================================================

/// A catalog product that can be sold or rented.
///
/// The external `code` is the identifier customers and clerks use; the
/// numeric `id` is the store's own key. There is deliberately no setter for
/// `code`: product codes never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-generated row id.
    pub id: i64,

    /// External item code, unique and immutable once created.
    pub code: String,

    /// Human-readable description.
    pub description: String,

    /// Retail value per unit.
    pub price: Money,

    /// Units currently available, never negative.
    pub stock: Quantity,
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Lifecycle status of a transaction.
///
/// The only transition is Open → Closed, performed by [`Transaction::close`].
/// There is no way back: reopening a closed transaction is not a thing this
/// system does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Line items may still be added.
    #[default]
    Open,
    /// Finalized; the persisted total was written at this point.
    Closed,
}

impl TransactionStatus {
    /// Single-character code used in the `status` column.
    pub const fn as_code(&self) -> &'static str {
        match self {
            TransactionStatus::Open => "O",
            TransactionStatus::Closed => "C",
        }
    }

    /// Parses the persisted single-character code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "O" => Some(TransactionStatus::Open),
            "C" => Some(TransactionStatus::Closed),
            _ => None,
        }
    }
}

// =============================================================================
// Return Status (rental axis)
// =============================================================================

/// Whether a rental's items have come back.
///
/// This axis is independent of [`TransactionStatus`]: a rental can be
/// Closed and Waiting (items still out) or Closed and Returned. Marking
/// items returned does not require the rental to be closed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    /// Items are still with the customer.
    #[default]
    Waiting,
    /// Items have been returned.
    Returned,
}

impl ReturnStatus {
    /// Integer code used in the `return_status` column (0 | 1).
    pub const fn as_int(&self) -> i64 {
        match self {
            ReturnStatus::Waiting => 0,
            ReturnStatus::Returned => 1,
        }
    }

    /// Parses the persisted integer code.
    pub fn from_int(value: i64) -> Option<Self> {
        match value {
            0 => Some(ReturnStatus::Waiting),
            1 => Some(ReturnStatus::Returned),
            _ => None,
        }
    }
}

// =============================================================================
// Transaction Kind (strategy)
// =============================================================================

/// Per-line validation rules a transaction kind imposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRules {
    /// Largest quantity a single add call may carry, if bounded.
    pub max_per_line: Option<Quantity>,

    /// Whether quantities must be whole units (physical item instances).
    pub whole_units: bool,
}

/// Strategy trait that turns the one [`Transaction`] type into a sale or a
/// rental.
///
/// Implementations are zero-sized markers; all behavior lives in the
/// associated items. Anything the two kinds genuinely share stays on
/// `Transaction` itself.
pub trait TransactionKind: Copy + fmt::Debug + Send + Sync + 'static {
    /// Lower-case noun for error messages and logs ("sale", "rental").
    const NOUN: &'static str;

    /// Kind-specific state carried by the transaction.
    type Ext: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// What a caller must supply to open a new transaction of this kind.
    type Terms: Send;

    /// The rules a new line item must satisfy.
    fn line_rules() -> LineRules;

    /// Computes a line item's subtotal from the unit price and quantity.
    fn line_subtotal(unit_price: Money, qty: Quantity) -> Money;

    /// Builds the initial kind-specific state for a freshly opened
    /// transaction.
    fn ext_for_new(terms: Self::Terms) -> Self::Ext;
}

/// Marker kind for sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleKind;

impl TransactionKind for SaleKind {
    const NOUN: &'static str = "sale";

    type Ext = ();
    type Terms = ();

    fn line_rules() -> LineRules {
        LineRules {
            max_per_line: None,
            whole_units: false,
        }
    }

    /// A sale charges full retail value: `price × qty`.
    fn line_subtotal(unit_price: Money, qty: Quantity) -> Money {
        unit_price.mul_quantity(qty)
    }

    fn ext_for_new(_terms: ()) {}
}

/// Kind-specific state of a rental: when the items are due back, and
/// whether they came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalState {
    /// Date the items must be returned by before penalties accrue.
    pub due_date: NaiveDate,

    /// Whether the items have been returned.
    pub return_status: ReturnStatus,
}

/// Marker kind for rentals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalKind;

impl TransactionKind for RentalKind {
    const NOUN: &'static str = "rental";

    type Ext = RentalState;
    /// Opening a rental requires its due date.
    type Terms = NaiveDate;

    fn line_rules() -> LineRules {
        LineRules {
            // One physical instance per add call; renting two copies of the
            // same item takes two calls.
            max_per_line: Some(Quantity::ONE),
            whole_units: true,
        }
    }

    /// A rental charges a fee of 20% of retail value: `price × qty × 20%`.
    fn line_subtotal(unit_price: Money, qty: Quantity) -> Money {
        unit_price.mul_quantity(qty).percent_bps(RENTAL_FEE_BPS)
    }

    fn ext_for_new(due_date: NaiveDate) -> RentalState {
        RentalState {
            due_date,
            return_status: ReturnStatus::Waiting,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product-and-quantity entry within a transaction.
///
/// The persisted record stores only the product's id; the in-memory line
/// carries the product resolved through the product store at load time so
/// subtotals can be computed without further lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<K: TransactionKind> {
    id: Option<i64>,
    product: Product,
    qty: Quantity,
    marker: PhantomData<K>,
}

impl<K: TransactionKind> LineItem<K> {
    /// Creates a line that has not been persisted yet (`id` is `None`).
    pub fn new(product: Product, qty: Quantity) -> Self {
        LineItem {
            id: None,
            product,
            qty,
            marker: PhantomData,
        }
    }

    /// Rebuilds a line from its persisted record.
    pub fn restore(id: i64, product: Product, qty: Quantity) -> Self {
        LineItem {
            id: Some(id),
            product,
            qty,
            marker: PhantomData,
        }
    }

    /// The persisted record id, once known.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Backfills the record id after the line has been persisted.
    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    /// The product this line reserves.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// The reserved quantity.
    pub fn qty(&self) -> Quantity {
        self.qty
    }

    /// This line's share of the transaction total, per the kind's formula.
    pub fn subtotal(&self) -> Money {
        K::line_subtotal(self.product.price, self.qty)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A sale or rental: a dated, open-or-closed header plus an append-only
/// sequence of line items.
///
/// The total is recomputed from the lines on every call; it is never
/// cached in memory. The `total` column in storage is a snapshot written
/// once, at close time.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<K: TransactionKind> {
    id: i64,
    opened_on: NaiveDate,
    status: TransactionStatus,
    lines: Vec<LineItem<K>>,
    ext: K::Ext,
}

/// A sale transaction.
pub type Sale = Transaction<SaleKind>;

/// A rental transaction.
pub type Rental = Transaction<RentalKind>;

impl<K: TransactionKind> Transaction<K> {
    /// Creates a freshly opened transaction with no line items.
    pub fn new(id: i64, opened_on: NaiveDate, ext: K::Ext) -> Self {
        Transaction {
            id,
            opened_on,
            status: TransactionStatus::Open,
            lines: Vec::new(),
            ext,
        }
    }

    /// Rebuilds a transaction from persisted state.
    pub fn restore(
        id: i64,
        opened_on: NaiveDate,
        status: TransactionStatus,
        lines: Vec<LineItem<K>>,
        ext: K::Ext,
    ) -> Self {
        Transaction {
            id,
            opened_on,
            status,
            lines,
            ext,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn opened_on(&self) -> NaiveDate {
        self.opened_on
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Whether line items may still be added.
    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::Open
    }

    /// Marks the transaction closed. One-way; calling it again changes
    /// nothing.
    pub fn close(&mut self) {
        self.status = TransactionStatus::Closed;
    }

    /// The ordered line items. Lines are only ever appended; removal
    /// happens solely through whole-transaction deletion.
    pub fn lines(&self) -> &[LineItem<K>] {
        &self.lines
    }

    /// Appends a line item without any rule checking; validation is the
    /// service's job. Returns the appended line so its record id can be
    /// backfilled after the insert.
    pub fn append_line(&mut self, product: Product, qty: Quantity) -> &mut LineItem<K> {
        self.lines.push(LineItem::new(product, qty));
        self.lines.last_mut().expect("line was just pushed")
    }

    /// The transaction total: the sum of every line's subtotal, recomputed.
    pub fn total(&self) -> Money {
        self.lines
            .iter()
            .fold(Money::zero(), |acc, line| acc + line.subtotal())
    }

    /// Kind-specific state.
    pub fn ext(&self) -> &K::Ext {
        &self.ext
    }
}

/// Rental-only accessors for the due date and the return axis.
impl Transaction<RentalKind> {
    /// Date the items must be back by.
    pub fn due_date(&self) -> NaiveDate {
        self.ext.due_date
    }

    pub fn return_status(&self) -> ReturnStatus {
        self.ext.return_status
    }

    pub fn is_returned(&self) -> bool {
        self.ext.return_status == ReturnStatus::Returned
    }

    /// Flags the rental's items as fully returned.
    pub fn mark_returned(&mut self) {
        self.ext.return_status = ReturnStatus::Returned;
    }

    /// Flags the rental's items as still out.
    pub fn unmark_returned(&mut self) {
        self.ext.return_status = ReturnStatus::Waiting;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
