//! Sale lifecycle: the line-item protocol, close semantics, and deletion.

mod support;

use rentix_core::{CoreError, Quantity, TransactionStatus};
use rentix_db::ServiceError;
use support::*;

#[tokio::test]
async fn close_writes_the_recomputed_total() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    assert!(sale.is_open());
    assert!(sale.lines().is_empty());

    // (€10.00 × 2) + (€5.00 × 3) = €35.00
    sales.add_line_item(&mut sale, "WIDGET-4", Quantity::from_units(2)).await.unwrap();
    sales.add_line_item(&mut sale, "BOOK-5", Quantity::from_units(3)).await.unwrap();
    assert_eq!(sale.total().cents(), 3500);

    sales.close(&mut sale).await.unwrap();
    assert_eq!(sale.status(), TransactionStatus::Closed);

    // the persisted snapshot matches the recomputed total
    let stored: i64 = sqlx::query_scalar("SELECT total FROM sale WHERE id = ?1")
        .bind(sale.id())
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(stored, 3500);
}

#[tokio::test]
async fn closing_twice_is_a_no_op() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    sales.add_line_item(&mut sale, "WIDGET-4", Quantity::from_units(2)).await.unwrap();

    sales.close(&mut sale).await.unwrap();
    let first_total = sale.total();

    sales.close(&mut sale).await.unwrap();
    assert_eq!(sale.total(), first_total);
    assert_eq!(sale.status(), TransactionStatus::Closed);
}

#[tokio::test]
async fn adding_lines_consumes_stock_up_front() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    sales.add_line_item(&mut sale, "WIDGET-4", Quantity::from_units(3)).await.unwrap();

    // stock row already reflects the reservation, before any close
    assert_eq!(stock_of(&db, "WIDGET-4").await, Quantity::from_units(1));
}

#[tokio::test]
async fn fractional_sale_quantities_are_allowed() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    sales
        .add_line_item(&mut sale, "BULK-9", Quantity::from_millis(2_500))
        .await
        .unwrap();

    // 2.5 × €2.00 = €5.00
    assert_eq!(sale.total().cents(), 500);
    assert_eq!(stock_of(&db, "BULK-9").await, Quantity::from_millis(7_500));
}

#[tokio::test]
async fn closed_sale_rejects_new_lines() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    sales.close(&mut sale).await.unwrap();

    let err = sales
        .add_line_item(&mut sale, "WIDGET-4", Quantity::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Rule(CoreError::AlreadyClosed { .. })));

    // nothing was reserved or recorded
    assert!(sale.lines().is_empty());
    assert_eq!(stock_of(&db, "WIDGET-4").await, Quantity::from_units(4));
}

#[tokio::test]
async fn negative_quantity_is_rejected_before_any_write() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    let err = sales
        .add_line_item(&mut sale, "WIDGET-4", Quantity::from_millis(-1_000))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Rule(CoreError::NegativeQuantity { .. })));
    assert!(sale.lines().is_empty());
    assert_eq!(stock_of(&db, "WIDGET-4").await, Quantity::from_units(4));
}

#[tokio::test]
async fn unknown_product_code_is_rejected() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    let err = sales
        .add_line_item(&mut sale, "NOPE-0", Quantity::ONE)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UnknownProduct { .. }));
    assert!(sale.lines().is_empty());
}

#[tokio::test]
async fn insufficient_stock_leaves_everything_unchanged() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    let err = sales
        .add_line_item(&mut sale, "WIDGET-4", Quantity::from_units(100))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Rule(CoreError::InsufficientStock { .. })
    ));

    assert!(sale.lines().is_empty());
    assert_eq!(stock_of(&db, "WIDGET-4").await, Quantity::from_units(4));
}

#[tokio::test]
async fn round_trip_reproduces_total_status_and_line_count() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    sales.add_line_item(&mut sale, "WIDGET-4", Quantity::from_units(2)).await.unwrap();
    sales.add_line_item(&mut sale, "BOOK-5", Quantity::from_units(3)).await.unwrap();
    sales.add_line_item(&mut sale, "BULK-9", Quantity::from_millis(500)).await.unwrap();
    sales.close(&mut sale).await.unwrap();

    let reloaded = sales.fetch(sale.id()).await.unwrap();
    assert_eq!(reloaded.status(), TransactionStatus::Closed);
    assert_eq!(reloaded.lines().len(), 3);
    assert_eq!(reloaded.total(), sale.total());
    assert_eq!(reloaded.opened_on(), sale.opened_on());

    // line ids were assigned by the store and survive the round trip
    assert!(reloaded.lines().iter().all(|line| line.id().is_some()));
}

#[tokio::test]
async fn delete_removes_the_sale_but_not_the_stock_consumption() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut sale = sales.open(()).await.unwrap();
    sales.add_line_item(&mut sale, "WIDGET-4", Quantity::from_units(2)).await.unwrap();
    let id = sale.id();

    sales.delete(sale).await.unwrap();

    // gone from point lookup and from the full scan
    assert!(matches!(
        sales.fetch(id).await.unwrap_err(),
        ServiceError::NotFound { .. }
    ));
    assert!(sales.fetch_all().await.unwrap().iter().all(|s| s.id() != id));

    // line items went with it
    let orphan_lines: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM saleproduct WHERE transaction_id = ?1")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(orphan_lines, 0);

    // deleting a sale does NOT give the stock back
    assert_eq!(stock_of(&db, "WIDGET-4").await, Quantity::from_units(2));
}

#[tokio::test]
async fn find_matching_filters_with_a_caller_predicate() {
    let db = seeded_db().await;
    let sales = sale_service(&db);

    let mut small = sales.open(()).await.unwrap();
    sales.add_line_item(&mut small, "BOOK-5", Quantity::ONE).await.unwrap();

    let mut big = sales.open(()).await.unwrap();
    sales.add_line_item(&mut big, "WIDGET-4", Quantity::from_units(3)).await.unwrap();
    sales.close(&mut big).await.unwrap();

    let closed = sales.find_matching(|s| !s.is_open()).await.unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].id(), big.id());

    let expensive = sales
        .find_matching(|s| s.total().cents() > 1000)
        .await
        .unwrap();
    assert_eq!(expensive.len(), 1);
    assert_eq!(expensive[0].id(), big.id());
}
