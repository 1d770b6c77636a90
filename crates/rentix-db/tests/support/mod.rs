//! Shared bootstrap for the integration tests: an isolated in-memory
//! database plus a small seeded catalog.

#![allow(dead_code)] // each test binary uses its own subset of helpers

use chrono::NaiveDate;
use rentix_core::{Money, Product, Quantity};
use rentix_db::{Database, DbConfig, RentalService, SaleService, TransactionService};

/// Fresh, isolated in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database should come up")
}

/// Seeds the catalog every test works against.
///
/// | code     | price  | stock |
/// |----------|--------|-------|
/// | CAM-1    | €35.00 | 3     |
/// | LENS-2   | €41.00 | 5     |
/// | TRIPOD-3 | €55.00 | 2     |
/// | WIDGET-4 | €10.00 | 4     |
/// | BOOK-5   | €5.00  | 6     |
/// | BULK-9   | €2.00  | 10    |
pub async fn seed_catalog(db: &Database) {
    let products = db.products();
    for (code, description, price, stock) in [
        ("CAM-1", "compact camera", 3500, 3),
        ("LENS-2", "50mm lens", 4100, 5),
        ("TRIPOD-3", "carbon tripod", 5500, 2),
        ("WIDGET-4", "widget", 1000, 4),
        ("BOOK-5", "field guide", 500, 6),
        ("BULK-9", "bulk filament", 200, 10),
    ] {
        products
            .insert(
                code,
                description,
                Money::from_cents(price),
                Quantity::from_units(stock),
            )
            .await
            .expect("seed insert should succeed");
    }
}

/// Database + seeded catalog in one call.
pub async fn seeded_db() -> Database {
    let db = test_db().await;
    seed_catalog(&db).await;
    db
}

pub fn sale_service(db: &Database) -> SaleService {
    TransactionService::new(db.products(), db.sales())
}

pub fn rental_service(db: &Database) -> RentalService {
    TransactionService::new(db.products(), db.rentals())
}

/// Current stock of a seeded product, for assertions.
pub async fn stock_of(db: &Database, code: &str) -> Quantity {
    product(db, code).await.stock
}

pub async fn product(db: &Database, code: &str) -> Product {
    db.products()
        .get_by_code(code)
        .await
        .expect("product lookup should succeed")
        .unwrap_or_else(|| panic!("product {code} should be seeded"))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
