//! # Transaction Repository
//!
//! Database operations for transaction headers and their line items,
//! generic over the transaction kind.
//!
//! ## One Mapper, Two Kinds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │             TransactionRepository<K: TransactionSchema>                 │
//! │                                                                         │
//! │   K = SaleKind                        K = RentalKind                    │
//! │   ──────────────                      ──────────────                    │
//! │   sale / saleproduct tables           rental / rentalproduct tables     │
//! │   header: id, date, total, status     header adds return_date,          │
//! │                                       return_status                     │
//! │                                                                         │
//! │   The SQL text and the two kind-specific hooks (bind extra insert       │
//! │   columns, read extra header columns) live in TransactionSchema.        │
//! │   Everything else (caching, line loading, delete ordering) is           │
//! │   written once.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cache Discipline
//! Every write (line insert, header update, return-status update, delete)
//! ends by invalidating the header's cache entry, so the next read reloads
//! the just-committed state. Reads populate the cache and hand out shared
//! instances.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::cache::EntityCache;
use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use rentix_core::{
    LineItem, Money, Quantity, RentalKind, RentalState, ReturnStatus, SaleKind, Transaction,
    TransactionKind, TransactionStatus,
};

// =============================================================================
// Per-Kind SQL (TransactionSchema)
// =============================================================================

/// The storage face of a [`TransactionKind`]: the SQL for each operation
/// and the hooks for its extra header columns.
pub trait TransactionSchema: TransactionKind {
    const INSERT_HEADER_SQL: &'static str;
    const SELECT_HEADER_SQL: &'static str;
    const SELECT_ALL_HEADERS_SQL: &'static str;
    const UPDATE_HEADER_SQL: &'static str;
    const DELETE_HEADER_SQL: &'static str;

    const INSERT_LINE_SQL: &'static str;
    const SELECT_LINES_SQL: &'static str;
    const DELETE_LINES_SQL: &'static str;

    /// Binds the kind-specific insert columns after the date placeholder.
    fn bind_new_header<'q>(
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        ext: &Self::Ext,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;

    /// Reads the kind-specific columns off a header row.
    fn ext_from_row(row: &SqliteRow) -> DbResult<Self::Ext>;
}

impl TransactionSchema for SaleKind {
    const INSERT_HEADER_SQL: &'static str =
        "INSERT INTO sale (date, total, status) VALUES (?1, 0, 'O')";
    const SELECT_HEADER_SQL: &'static str =
        "SELECT id, date, total, status FROM sale WHERE id = ?1";
    const SELECT_ALL_HEADERS_SQL: &'static str = "SELECT id, date, total, status FROM sale";
    const UPDATE_HEADER_SQL: &'static str = "UPDATE sale SET total = ?1, status = ?2 WHERE id = ?3";
    const DELETE_HEADER_SQL: &'static str = "DELETE FROM sale WHERE id = ?1";

    const INSERT_LINE_SQL: &'static str =
        "INSERT INTO saleproduct (transaction_id, product_id, qty) VALUES (?1, ?2, ?3)";
    const SELECT_LINES_SQL: &'static str =
        "SELECT id, product_id, qty FROM saleproduct WHERE transaction_id = ?1 ORDER BY id";
    const DELETE_LINES_SQL: &'static str = "DELETE FROM saleproduct WHERE transaction_id = ?1";

    fn bind_new_header<'q>(
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        _ext: &(),
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        // sales have no extra header columns
        query
    }

    fn ext_from_row(_row: &SqliteRow) -> DbResult<()> {
        Ok(())
    }
}

impl TransactionSchema for RentalKind {
    const INSERT_HEADER_SQL: &'static str =
        "INSERT INTO rental (date, total, status, return_date, return_status) \
         VALUES (?1, 0, 'O', ?2, ?3)";
    const SELECT_HEADER_SQL: &'static str =
        "SELECT id, date, total, status, return_date, return_status FROM rental WHERE id = ?1";
    const SELECT_ALL_HEADERS_SQL: &'static str =
        "SELECT id, date, total, status, return_date, return_status FROM rental";
    const UPDATE_HEADER_SQL: &'static str =
        "UPDATE rental SET total = ?1, status = ?2 WHERE id = ?3";
    const DELETE_HEADER_SQL: &'static str = "DELETE FROM rental WHERE id = ?1";

    const INSERT_LINE_SQL: &'static str =
        "INSERT INTO rentalproduct (transaction_id, product_id, qty) VALUES (?1, ?2, ?3)";
    const SELECT_LINES_SQL: &'static str =
        "SELECT id, product_id, qty FROM rentalproduct WHERE transaction_id = ?1 ORDER BY id";
    const DELETE_LINES_SQL: &'static str = "DELETE FROM rentalproduct WHERE transaction_id = ?1";

    fn bind_new_header<'q>(
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        ext: &RentalState,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(ext.due_date)
            .bind(ext.return_status.as_int())
    }

    fn ext_from_row(row: &SqliteRow) -> DbResult<RentalState> {
        let due_date: NaiveDate = row.try_get("return_date")?;
        let raw_status: i64 = row.try_get("return_status")?;

        let return_status = ReturnStatus::from_int(raw_status).ok_or_else(|| {
            DbError::corrupt(format!("unrecognized return_status code {raw_status}"))
        })?;

        Ok(RentalState {
            due_date,
            return_status,
        })
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Raw row shape of the line-item tables.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: i64,
    product_id: i64,
    qty: i64,
}

/// Repository for transaction headers and line items of one kind.
///
/// Holds the kind's entity cache; construct it once per process (the
/// [`crate::pool::Database`] does this) and clone handles from there.
#[derive(Debug, Clone)]
pub struct TransactionRepository<K: TransactionSchema> {
    pool: SqlitePool,
    products: ProductRepository,
    cache: EntityCache<Transaction<K>>,
}

impl<K: TransactionSchema> TransactionRepository<K> {
    /// Creates a new repository with an empty cache.
    ///
    /// The product repository is needed to resolve each persisted line's
    /// product reference at load time.
    pub fn new(pool: SqlitePool, products: ProductRepository) -> Self {
        TransactionRepository {
            pool,
            products,
            cache: EntityCache::new(),
        }
    }

    /// Inserts a new open header dated today and returns the in-memory
    /// transaction carrying the generated id.
    pub async fn create(&self, ext: K::Ext) -> DbResult<Transaction<K>> {
        let opened_on = Utc::now().date_naive();

        let query = sqlx::query(K::INSERT_HEADER_SQL).bind(opened_on);
        let result = K::bind_new_header(query, &ext).execute(&self.pool).await?;

        let id = result.last_insert_rowid();
        debug!(kind = K::NOUN, id = %id, "Created transaction");

        Ok(Transaction::new(id, opened_on, ext))
    }

    /// Loads a transaction by id, serving cached instances when possible.
    ///
    /// ## Returns
    /// * `Ok(Some(..))` - the shared instance (cache hit or fresh load)
    /// * `Ok(None)` - no such id
    pub async fn load(&self, id: i64) -> DbResult<Option<Arc<Transaction<K>>>> {
        if let Some(hit) = self.cache.get(id) {
            debug!(kind = K::NOUN, id = %id, "Cache hit");
            return Ok(Some(hit));
        }

        let row = sqlx::query(K::SELECT_HEADER_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let txn = self.from_header_row(&row).await?;
        Ok(Some(self.cache.put(id, txn)))
    }

    /// Loads every transaction of this kind.
    ///
    /// Ids already cached are served from the cache so that repeated loads
    /// hand back identical instances; the rest are loaded and cached.
    pub async fn load_all(&self) -> DbResult<Vec<Arc<Transaction<K>>>> {
        let rows = sqlx::query(K::SELECT_ALL_HEADERS_SQL)
            .fetch_all(&self.pool)
            .await?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: i64 = row.try_get("id")?;
            match self.cache.get(id) {
                Some(hit) => transactions.push(hit),
                None => {
                    let txn = self.from_header_row(row).await?;
                    transactions.push(self.cache.put(id, txn));
                }
            }
        }

        debug!(kind = K::NOUN, count = transactions.len(), "Loaded all transactions");
        Ok(transactions)
    }

    /// Persists one line item and returns its generated id.
    ///
    /// The header's cache entry is invalidated: its stored state changed.
    pub async fn insert_line(
        &self,
        transaction_id: i64,
        product_id: i64,
        qty: Quantity,
    ) -> DbResult<i64> {
        debug!(
            kind = K::NOUN,
            transaction_id = %transaction_id,
            product_id = %product_id,
            qty = %qty,
            "Inserting line item"
        );

        let result = sqlx::query(K::INSERT_LINE_SQL)
            .bind(transaction_id)
            .bind(product_id)
            .bind(qty.millis())
            .execute(&self.pool)
            .await?;

        self.cache.invalidate(transaction_id);
        Ok(result.last_insert_rowid())
    }

    /// Writes the closing snapshot: total and status.
    pub async fn update_header(
        &self,
        id: i64,
        total: Money,
        status: TransactionStatus,
    ) -> DbResult<()> {
        debug!(kind = K::NOUN, id = %id, total = %total, "Updating header");

        let result = sqlx::query(K::UPDATE_HEADER_SQL)
            .bind(total.cents())
            .bind(status.as_code())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(K::NOUN, id));
        }

        self.cache.invalidate(id);
        Ok(())
    }

    /// Deletes a transaction: line items first (foreign-key ordering), then
    /// the header, then the cache entry.
    ///
    /// Stock consumed by the deleted lines is NOT restored.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(kind = K::NOUN, id = %id, "Deleting transaction");

        sqlx::query(K::DELETE_LINES_SQL)
            .bind(id)
            .execute(&self.pool)
            .await?;

        sqlx::query(K::DELETE_HEADER_SQL)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.cache.invalidate(id);
        Ok(())
    }

    /// Rebuilds a transaction from its header row plus its line items.
    async fn from_header_row(&self, row: &SqliteRow) -> DbResult<Transaction<K>> {
        let id: i64 = row.try_get("id")?;
        let opened_on: NaiveDate = row.try_get("date")?;
        let status_code: String = row.try_get("status")?;

        let status = TransactionStatus::from_code(&status_code).ok_or_else(|| {
            DbError::corrupt(format!(
                "unrecognized status code '{status_code}' on {} {id}",
                K::NOUN
            ))
        })?;

        let ext = K::ext_from_row(row)?;
        let lines = self.load_lines(id).await?;

        // the persisted total column is ignored on load: the in-memory
        // total is always recomputed from the lines
        Ok(Transaction::restore(id, opened_on, status, lines, ext))
    }

    /// Loads the line items of one transaction, resolving each product
    /// reference through the product repository.
    async fn load_lines(&self, transaction_id: i64) -> DbResult<Vec<LineItem<K>>> {
        let rows = sqlx::query_as::<_, LineRow>(K::SELECT_LINES_SQL)
            .bind(transaction_id)
            .fetch_all(&self.pool)
            .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let product = self
                .products
                .get_by_id(row.product_id)
                .await?
                .ok_or_else(|| DbError::not_found("product", row.product_id))?;

            lines.push(LineItem::restore(
                row.id,
                product,
                Quantity::from_millis(row.qty),
            ));
        }

        Ok(lines)
    }

    /// The cache, exposed for coherence assertions in tests.
    pub fn cache(&self) -> &EntityCache<Transaction<K>> {
        &self.cache
    }
}

/// Rental-only storage operation for the return axis.
impl TransactionRepository<RentalKind> {
    /// Persists the rental's return status and invalidates its cache entry.
    pub async fn update_return_status(&self, id: i64, status: ReturnStatus) -> DbResult<()> {
        debug!(id = %id, status = ?status, "Updating return status");

        let result = sqlx::query("UPDATE rental SET return_status = ?1 WHERE id = ?2")
            .bind(status.as_int())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(RentalKind::NOUN, id));
        }

        self.cache.invalidate(id);
        Ok(())
    }
}
