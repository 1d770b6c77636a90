//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Point lookup by row id and by external item code
//! - Insert (what catalog seeding calls)
//! - The check-then-write stock adjustment
//!
//! ## Stock Adjustment
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                adjust_stock(id, delta)                                  │
//! │                                                                         │
//! │  1. SELECT qty FROM product WHERE id = ?                                │
//! │       │                                                                 │
//! │       ├── no row → NotFound                                             │
//! │       ▼                                                                 │
//! │  2. qty + delta < 0 ?                                                   │
//! │       │                                                                 │
//! │       ├── yes → InsufficientStock, row untouched                        │
//! │       ▼                                                                 │
//! │  3. UPDATE product SET qty = qty + delta WHERE id = ?                   │
//! │                                                                         │
//! │  Steps 1-3 are NOT atomic with respect to other callers. The system     │
//! │  assumes a single writer; exposing this to concurrent callers would     │
//! │  need a lock or a conditional UPDATE.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use rentix_core::{Money, Product, Quantity};

/// Raw row shape of the `product` table.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    item_code: String,
    description: String,
    price: i64,
    qty: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Product {
        Product {
            id: row.id,
            code: row.item_code,
            description: row.description,
            price: Money::from_cents(row.price),
            stock: Quantity::from_millis(row.qty),
        }
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let product = repo
///     .get_by_code("CAM-1")
///     .await?
///     .ok_or(...)?;
///
/// // reserve two units
/// repo.adjust_stock(product.id, -Quantity::from_units(2)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its row id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - product found
    /// * `Ok(None)` - product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, item_code, description, price, qty FROM product WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Gets a product by its external item code.
    ///
    /// ## Arguments
    /// * `code` - external item code (e.g., "CAM-1")
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, item_code, description, price, qty FROM product WHERE item_code = ?1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Inserts a new product and returns it with its generated id.
    ///
    /// ## Returns
    /// * `Ok(Product)` - inserted product
    /// * `Err(DbError::UniqueViolation)` - item code already exists
    pub async fn insert(
        &self,
        code: &str,
        description: &str,
        price: Money,
        stock: Quantity,
    ) -> DbResult<Product> {
        debug!(code = %code, "Inserting product");

        let result = sqlx::query(
            "INSERT INTO product (item_code, description, price, qty) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(code)
        .bind(description)
        .bind(price.cents())
        .bind(stock.millis())
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            code: code.to_string(),
            description: description.to_string(),
            price,
            stock,
        })
    }

    /// Applies a signed stock delta: negative for consumption, positive for
    /// a return.
    ///
    /// Rejects the delta with [`DbError::InsufficientStock`], leaving the
    /// row untouched, if the resulting stock would go negative.
    ///
    /// ## Arguments
    /// * `id` - product row id
    /// * `delta` - change in stock
    pub async fn adjust_stock(&self, id: i64, delta: Quantity) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let current: Option<i64> = sqlx::query_scalar("SELECT qty FROM product WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let available = match current {
            Some(millis) => Quantity::from_millis(millis),
            None => return Err(DbError::not_found("product", id)),
        };

        let next = available + delta;
        if next.is_negative() {
            return Err(DbError::InsufficientStock {
                product_id: id,
                available,
                delta,
            });
        }

        sqlx::query("UPDATE product SET qty = ?1 WHERE id = ?2")
            .bind(next.millis())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
