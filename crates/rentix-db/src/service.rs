//! # Transaction Service
//!
//! The only component callers should mutate transactions through.
//!
//! ## The add_line_item Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │             add_line_item(txn, code, qty)                               │
//! │                                                                         │
//! │  1. txn closed?            → AlreadyClosed                              │
//! │  2. qty < 0?               → NegativeQuantity                           │
//! │  3. kind rules (rental:    → QuantityOverLimit /                        │
//! │     max 1 whole unit)        FractionalQuantity                         │
//! │  4. resolve product code   → UnknownProduct                             │
//! │  5. stock < qty?           → InsufficientStock                          │
//! │  ───────────── writes start here ─────────────                          │
//! │  6. adjust_stock(-qty)       (persisted)                                │
//! │  7. append line in memory                                               │
//! │  8. insert line record       (persisted, id backfilled)                 │
//! │                                                                         │
//! │  A crash between 6 and 8 leaves stock decremented with no recorded      │
//! │  line item. Known inconsistency window — there is no multi-statement    │
//! │  transaction here, and no compensation logic. Failures at or before     │
//! │  step 6 leave the in-memory line sequence untouched.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Tiers
//! Callers never see raw storage errors: every `DbError` is wrapped into
//! [`ServiceError::Persistence`] with a message naming the operation and
//! the affected transaction; rule violations arrive as
//! [`ServiceError::Rule`]. Nothing is retried.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::error::DbError;
use crate::repository::product::ProductRepository;
use crate::repository::transaction::{TransactionRepository, TransactionSchema};
use rentix_core::{validation, CoreError, Quantity, RentalKind, Transaction};

// =============================================================================
// Service Error (business tier)
// =============================================================================

/// What callers of the service see.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule said no. The operation had no side effects.
    #[error(transparent)]
    Rule(#[from] CoreError),

    /// The product code resolves to nothing.
    #[error("product {code} does not exist")]
    UnknownProduct { code: String },

    /// The requested transaction does not exist (or no longer does).
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// The storage tier failed; carries the causing error for diagnostics.
    #[error("{context}")]
    Persistence {
        context: String,
        #[source]
        source: DbError,
    },
}

impl ServiceError {
    /// Builds the storage-tier wrapper for one operation.
    fn persistence(context: String) -> impl FnOnce(DbError) -> ServiceError {
        move |source| ServiceError::Persistence { context, source }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Transaction Service
// =============================================================================

/// Enforces the lifecycle state machine and the stock-consistency protocol
/// for one transaction kind.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("rentix.db")).await?;
/// let sales = TransactionService::new(db.products(), db.sales());
///
/// let mut sale = sales.open(()).await?;
/// sales.add_line_item(&mut sale, "CAM-1", Quantity::from_units(2)).await?;
/// sales.close(&mut sale).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TransactionService<K: TransactionSchema> {
    products: ProductRepository,
    transactions: TransactionRepository<K>,
}

/// Service over sales.
pub type SaleService = TransactionService<rentix_core::SaleKind>;

/// Service over rentals.
pub type RentalService = TransactionService<RentalKind>;

impl<K: TransactionSchema> TransactionService<K> {
    /// Wires the service to its repositories. Both are cheap clones; the
    /// transaction repository brings the kind's entity cache with it.
    pub fn new(products: ProductRepository, transactions: TransactionRepository<K>) -> Self {
        TransactionService {
            products,
            transactions,
        }
    }

    /// Opens a new transaction: status Open, no line items, dated today.
    /// Rentals additionally record their due date and start as Waiting.
    pub async fn open(&self, terms: K::Terms) -> ServiceResult<Transaction<K>> {
        self.transactions
            .create(K::ext_for_new(terms))
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to create a new {}",
                K::NOUN
            )))
    }

    /// Adds a line item to an open transaction, reserving stock first.
    ///
    /// See the module docs for the numbered protocol and its failure
    /// semantics.
    pub async fn add_line_item(
        &self,
        txn: &mut Transaction<K>,
        code: &str,
        qty: Quantity,
    ) -> ServiceResult<()> {
        // steps 1-3: pure rule checks
        validation::check_new_line(txn, qty)?;

        // step 4: resolve the product
        let product = self
            .products
            .get_by_code(code)
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to look up product {code}"
            )))?
            .ok_or_else(|| ServiceError::UnknownProduct {
                code: code.to_string(),
            })?;

        // step 5: stock check against the freshly loaded product
        validation::check_stock(&product, qty)?;

        // step 6: reserve the stock, persisted before anything else
        self.products
            .adjust_stock(product.id, -qty)
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to reserve stock of {} for {} {}",
                code,
                K::NOUN,
                txn.id()
            )))?;

        // steps 7-8: append in memory, then persist the record
        let txn_id = txn.id();
        let product_id = product.id;
        let line = txn.append_line(product, qty);

        let line_id = self
            .transactions
            .insert_line(txn_id, product_id, qty)
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to add {code} to {} {txn_id}",
                K::NOUN
            )))?;
        line.set_id(line_id);

        Ok(())
    }

    /// Closes the transaction, persisting its recomputed total and status.
    /// Closing an already-closed transaction is a no-op.
    pub async fn close(&self, txn: &mut Transaction<K>) -> ServiceResult<()> {
        if !txn.is_open() {
            return Ok(());
        }

        debug!(kind = K::NOUN, id = txn.id(), total = %txn.total(), "Closing transaction");

        txn.close();
        self.transactions
            .update_header(txn.id(), txn.total(), txn.status())
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to close {} {}, or unable to find it",
                K::NOUN,
                txn.id()
            )))
    }

    /// Deletes the transaction and all its line items, and evicts it from
    /// the cache. Consumes the value: a deleted transaction cannot be used
    /// again.
    ///
    /// Stock consumed by its line items is deliberately NOT restored.
    pub async fn delete(&self, txn: Transaction<K>) -> ServiceResult<()> {
        self.transactions
            .delete(txn.id())
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to delete {} {}",
                K::NOUN,
                txn.id()
            )))
    }

    /// Loads a transaction by id, serving the cached instance when one
    /// exists.
    pub async fn fetch(&self, id: i64) -> ServiceResult<Arc<Transaction<K>>> {
        self.transactions
            .load(id)
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to retrieve {} {id}",
                K::NOUN
            )))?
            .ok_or(ServiceError::NotFound {
                entity: K::NOUN,
                id,
            })
    }

    /// Loads every transaction of this kind.
    pub async fn fetch_all(&self) -> ServiceResult<Vec<Arc<Transaction<K>>>> {
        self.transactions
            .load_all()
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to retrieve all {}s",
                K::NOUN
            )))
    }

    /// Loads every transaction and keeps those satisfying the predicate.
    ///
    /// The scan is restartable: each call re-runs the full load (cached
    /// instances are reused), so callers can filter with a fresh predicate
    /// any time.
    pub async fn find_matching<P>(
        &self,
        mut predicate: P,
    ) -> ServiceResult<Vec<Arc<Transaction<K>>>>
    where
        P: FnMut(&Transaction<K>) -> bool,
    {
        let all = self.fetch_all().await?;
        Ok(all
            .into_iter()
            .filter(|txn| predicate(txn.as_ref()))
            .collect())
    }
}

// =============================================================================
// Rental-Only Operations
// =============================================================================

impl TransactionService<RentalKind> {
    /// Flags the rental's items as fully returned, in memory and in
    /// storage. Does not require the rental to be closed.
    pub async fn mark_returned(&self, txn: &mut Transaction<RentalKind>) -> ServiceResult<()> {
        txn.mark_returned();
        self.transactions
            .update_return_status(txn.id(), txn.return_status())
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to mark rental {} as returned",
                txn.id()
            )))
    }

    /// Reverts the return flag, in memory and in storage.
    pub async fn unmark_returned(&self, txn: &mut Transaction<RentalKind>) -> ServiceResult<()> {
        txn.unmark_returned();
        self.transactions
            .update_return_status(txn.id(), txn.return_status())
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to mark rental {} as unreturned",
                txn.id()
            )))
    }

    /// Puts `qty` units of a product back in stock when rented items come
    /// over the counter.
    ///
    /// The pair is accepted as-is: nothing verifies that it corresponds to
    /// an outstanding line of any particular rental. Tightening this would
    /// change observable behavior, so it stays permissive.
    pub async fn return_line_item(&self, code: &str, qty: Quantity) -> ServiceResult<()> {
        let product = self
            .products
            .get_by_code(code)
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to look up product {code}"
            )))?
            .ok_or_else(|| ServiceError::UnknownProduct {
                code: code.to_string(),
            })?;

        debug!(code = %code, qty = %qty, "Returning rented items to stock");

        self.products
            .adjust_stock(product.id, qty)
            .await
            .map_err(ServiceError::persistence(format!(
                "unable to restore stock of {code}"
            )))
    }
}
