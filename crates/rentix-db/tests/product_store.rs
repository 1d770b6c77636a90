//! Product repository: lookups, inserts, and the stock adjustment
//! protocol's guarantees.

mod support;

use rentix_core::{Money, Quantity};
use rentix_db::DbError;
use support::*;

#[tokio::test]
async fn insert_then_lookup_by_code_and_id() {
    let db = test_db().await;
    let products = db.products();

    let inserted = products
        .insert("CAM-1", "compact camera", Money::from_cents(3500), Quantity::from_units(3))
        .await
        .unwrap();

    let by_code = products.get_by_code("CAM-1").await.unwrap().unwrap();
    assert_eq!(by_code, inserted);
    assert_eq!(by_code.price.cents(), 3500);
    assert_eq!(by_code.stock, Quantity::from_units(3));

    let by_id = products.get_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(by_id, inserted);
}

#[tokio::test]
async fn missing_products_come_back_as_none() {
    let db = test_db().await;

    assert!(db.products().get_by_code("NOPE").await.unwrap().is_none());
    assert!(db.products().get_by_id(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_item_code_is_rejected() {
    let db = test_db().await;
    let products = db.products();

    products
        .insert("CAM-1", "compact camera", Money::from_cents(3500), Quantity::from_units(3))
        .await
        .unwrap();

    let err = products
        .insert("CAM-1", "another camera", Money::from_cents(100), Quantity::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}

#[tokio::test]
async fn adjust_stock_applies_signed_deltas() {
    let db = seeded_db().await;
    let products = db.products();
    let cam = product(&db, "CAM-1").await;

    // consume two units, return one
    products.adjust_stock(cam.id, -Quantity::from_units(2)).await.unwrap();
    assert_eq!(stock_of(&db, "CAM-1").await, Quantity::from_units(1));

    products.adjust_stock(cam.id, Quantity::ONE).await.unwrap();
    assert_eq!(stock_of(&db, "CAM-1").await, Quantity::from_units(2));
}

#[tokio::test]
async fn stock_never_goes_negative() {
    let db = seeded_db().await;
    let products = db.products();
    let cam = product(&db, "CAM-1").await; // stock 3

    let err = products
        .adjust_stock(cam.id, -Quantity::from_units(4))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InsufficientStock { .. }));

    // rejection left the row untouched
    assert_eq!(stock_of(&db, "CAM-1").await, Quantity::from_units(3));

    // draining to exactly zero is fine
    products.adjust_stock(cam.id, -Quantity::from_units(3)).await.unwrap();
    assert_eq!(stock_of(&db, "CAM-1").await, Quantity::ZERO);
}

#[tokio::test]
async fn adjust_stock_of_unknown_product_is_not_found() {
    let db = test_db().await;

    let err = db
        .products()
        .adjust_stock(42, Quantity::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "product", id: 42 }));
}
