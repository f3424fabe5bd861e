//! Analytics pipeline integration tests: seeded historical orders in,
//! bucketed price series and statistics out.

mod common;

use bazaar_server::analytics::{
    Granularity, TrendFilter, compute_price_trends, compute_statistics,
};
use bazaar_server::analytics::stats::TrendDirection;
use bazaar_server::db;
use chrono::NaiveDate;
use shared::models::{Order, OrderLine, OrderStatus};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

use common::{active_supplier, active_vendor, create_item, test_pool};

fn date_ms(date: &str) -> i64 {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}

fn parse_date(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
}

/// Insert a historical order directly, with a controlled creation time
async fn seed_order(
    pool: &SqlitePool,
    vendor_id: i64,
    supplier_id: i64,
    lines: &[(i64, f64, i64)],
    created: &str,
) {
    let id = snowflake_id();
    let created_at = date_ms(created);

    let items: Vec<OrderLine> = lines
        .iter()
        .map(|&(item_id, price, quantity)| OrderLine {
            item_id,
            name: "snapshot".to_string(),
            price,
            quantity,
            unit: "kg".to_string(),
            total: price * quantity as f64,
        })
        .collect();
    let total_amount = items.iter().map(|l| l.total).sum();

    let order = Order {
        id,
        order_id: format!("ORD-{}", id),
        vendor_id,
        supplier_id,
        items,
        total_amount,
        payment_method: "cash".to_string(),
        delivery_address: "Stall 5".to_string(),
        status: OrderStatus::Delivered,
        created_at,
        updated_at: created_at,
    };

    let mut conn = pool.acquire().await.unwrap();
    db::orders::insert(&mut *conn, &order).await.unwrap();
}

fn filter(granularity: Granularity) -> TrendFilter {
    TrendFilter {
        granularity,
        ..Default::default()
    }
}

#[tokio::test]
async fn daily_buckets_group_and_aggregate() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier = active_supplier(&pool, "supplier@example.com").await;
    let onions = create_item(&pool, supplier.id, "Onions", "vegetables", 10.0, 100).await;

    // Two observations on the first day, one on the second
    seed_order(&pool, vendor.id, supplier.id, &[(onions.id, 10.0, 2)], "2025-07-01").await;
    seed_order(&pool, vendor.id, supplier.id, &[(onions.id, 20.0, 1)], "2025-07-01").await;
    seed_order(&pool, vendor.id, supplier.id, &[(onions.id, 30.0, 5)], "2025-07-02").await;

    let series = compute_price_trends(&pool, &filter(Granularity::Daily))
        .await
        .unwrap();

    assert_eq!(series.len(), 2);

    assert_eq!(series[0].date, "2025-07-01");
    assert_eq!(series[0].price, 15.0);
    assert_eq!(series[0].avg_price, 15.0);
    assert_eq!(series[0].min_price, 10.0);
    assert_eq!(series[0].max_price, 20.0);
    assert_eq!(series[0].volume, 3);
    assert_eq!(series[0].product_name, "Onions");
    assert_eq!(series[0].category, "vegetables");
    assert_eq!(series[0].supplier_id, supplier.id);

    assert_eq!(series[1].date, "2025-07-02");
    assert_eq!(series[1].price, 30.0);
    assert_eq!(series[1].volume, 5);
}

#[tokio::test]
async fn weekly_buckets_start_on_sunday() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier = active_supplier(&pool, "supplier@example.com").await;
    let item = create_item(&pool, supplier.id, "Onions", "vegetables", 10.0, 100).await;

    // Tuesday and Saturday share a week; the following Sunday opens a new one
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 10.0, 1)], "2025-07-15").await;
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 20.0, 1)], "2025-07-19").await;
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 30.0, 1)], "2025-07-20").await;

    let series = compute_price_trends(&pool, &filter(Granularity::Weekly))
        .await
        .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, "2025-07-13");
    assert_eq!(series[0].price, 15.0);
    assert_eq!(series[0].volume, 2);
    assert_eq!(series[1].date, "2025-07-20");
    assert_eq!(series[1].price, 30.0);
}

#[tokio::test]
async fn monthly_buckets_use_first_of_month() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier = active_supplier(&pool, "supplier@example.com").await;
    let item = create_item(&pool, supplier.id, "Onions", "vegetables", 10.0, 100).await;

    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 10.0, 1)], "2025-07-15").await;
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 20.0, 1)], "2025-07-20").await;
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 40.0, 2)], "2025-08-02").await;

    let series = compute_price_trends(&pool, &filter(Granularity::Monthly))
        .await
        .unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series[0].date, "2025-07-01");
    assert_eq!(series[0].price, 15.0);
    assert_eq!(series[1].date, "2025-08-01");
    assert_eq!(series[1].price, 40.0);
}

#[tokio::test]
async fn empty_candidate_set_yields_empty_series() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier = active_supplier(&pool, "supplier@example.com").await;
    let item = create_item(&pool, supplier.id, "Onions", "vegetables", 10.0, 100).await;
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 10.0, 1)], "2025-07-15").await;

    // No item matches the category filter: empty result, not an error
    let series = compute_price_trends(
        &pool,
        &TrendFilter {
            categories: vec!["spices".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(series.is_empty());
}

#[tokio::test]
async fn product_and_supplier_filters_restrict_the_series() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier_a = active_supplier(&pool, "a@example.com").await;
    let supplier_b = active_supplier(&pool, "b@example.com").await;
    let onions = create_item(&pool, supplier_a.id, "Onions", "vegetables", 10.0, 100).await;
    let paneer = create_item(&pool, supplier_b.id, "Paneer", "dairy", 80.0, 100).await;

    seed_order(&pool, vendor.id, supplier_a.id, &[(onions.id, 10.0, 1)], "2025-07-01").await;
    seed_order(&pool, vendor.id, supplier_b.id, &[(paneer.id, 80.0, 2)], "2025-07-01").await;

    let series = compute_price_trends(
        &pool,
        &TrendFilter {
            products: vec![onions.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].product_id, onions.id);

    let series = compute_price_trends(
        &pool,
        &TrendFilter {
            suppliers: vec![supplier_b.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].product_name, "Paneer");
}

#[tokio::test]
async fn date_range_excludes_outside_orders() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier = active_supplier(&pool, "supplier@example.com").await;
    let item = create_item(&pool, supplier.id, "Onions", "vegetables", 10.0, 100).await;

    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 10.0, 1)], "2025-06-01").await;
    seed_order(&pool, vendor.id, supplier.id, &[(item.id, 20.0, 1)], "2025-08-01").await;

    // Window covers the later order and the item's own creation date
    let series = compute_price_trends(
        &pool,
        &TrendFilter {
            start_date: Some(parse_date("2025-07-01")),
            end_date: Some(parse_date("2099-12-31")),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].date, "2025-08-01");
    assert_eq!(series[0].price, 20.0);
}

#[tokio::test]
async fn statistics_over_computed_series() {
    let (_dir, pool) = test_pool().await;
    let vendor = active_vendor(&pool, "vendor@example.com").await;
    let supplier = active_supplier(&pool, "supplier@example.com").await;
    let item = create_item(&pool, supplier.id, "Onions", "vegetables", 10.0, 100).await;

    // One observation per day: 10, 10, 10, 20, 20, 20
    for (day, price) in [(1, 10.0), (2, 10.0), (3, 10.0), (4, 20.0), (5, 20.0), (6, 20.0)] {
        seed_order(
            &pool,
            vendor.id,
            supplier.id,
            &[(item.id, price, 1)],
            &format!("2025-07-{:02}", day),
        )
        .await;
    }

    let series = compute_price_trends(&pool, &filter(Granularity::Daily))
        .await
        .unwrap();
    assert_eq!(series.len(), 6);

    let stats = compute_statistics(&series).unwrap();
    assert_eq!(stats.avg_price, 15.0);
    assert_eq!(stats.min_price, 10.0);
    assert_eq!(stats.max_price, 20.0);
    assert_eq!(stats.trend_direction, TrendDirection::Up);
    assert_eq!(stats.trend_percentage, 100.0);

    // Same input, same output
    let again = compute_statistics(&series).unwrap();
    assert_eq!(stats.volatility, again.volatility);
}
