//! Order queries
//!
//! The order header and its lines live in two tables; the aggregate is
//! reassembled on read. Inserts happen inside the caller's transaction so
//! stock reservation and order creation commit or roll back together.

use shared::models::{Order, OrderLine, OrderStatus};
use shared::util::now_millis;
use sqlx::{SqliteConnection, SqlitePool};

/// Order header row (lines are loaded separately)
#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub order_id: String,
    pub vendor_id: i64,
    pub supplier_id: i64,
    pub total_amount: f64,
    pub payment_method: String,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderRow {
    pub fn into_order(self, items: Vec<OrderLine>) -> Order {
        Order {
            id: self.id,
            order_id: self.order_id,
            vendor_id: self.vendor_id,
            supplier_id: self.supplier_id,
            items,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            delivery_address: self.delivery_address,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Insert the order aggregate (header + lines). Runs on the caller's
/// connection, normally a transaction that also reserved the stock.
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO orders (id, order_id, vendor_id, supplier_id, total_amount,
                             payment_method, delivery_address, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(order.id)
    .bind(&order.order_id)
    .bind(order.vendor_id)
    .bind(order.supplier_id)
    .bind(order.total_amount)
    .bind(&order.payment_method)
    .bind(&order.delivery_address)
    .bind(order.status)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    for line in &order.items {
        sqlx::query(
            "INSERT INTO order_lines (order_pk, item_id, name, price, quantity, unit, total)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(order.id)
        .bind(line.item_id)
        .bind(&line.name)
        .bind(line.price)
        .bind(line.quantity)
        .bind(&line.unit)
        .bind(line.total)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn load_lines(pool: &SqlitePool, order_pk: i64) -> Result<Vec<OrderLine>, sqlx::Error> {
    sqlx::query_as(
        "SELECT item_id, name, price, quantity, unit, total
         FROM order_lines WHERE order_pk = ?1 ORDER BY id",
    )
    .bind(order_pk)
    .fetch_all(pool)
    .await
}

/// Load lines inside an open transaction (cancellation restock path)
pub async fn load_lines_tx(
    conn: &mut SqliteConnection,
    order_pk: i64,
) -> Result<Vec<OrderLine>, sqlx::Error> {
    sqlx::query_as(
        "SELECT item_id, name, price, quantity, unit, total
         FROM order_lines WHERE order_pk = ?1 ORDER BY id",
    )
    .bind(order_pk)
    .fetch_all(conn)
    .await
}

pub async fn list_for_vendor(
    pool: &SqlitePool,
    vendor_id: i64,
) -> Result<Vec<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE vendor_id = ?1 ORDER BY created_at DESC")
        .bind(vendor_id)
        .fetch_all(pool)
        .await
}

pub async fn list_for_supplier(
    pool: &SqlitePool,
    supplier_id: i64,
) -> Result<Vec<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE supplier_id = ?1 ORDER BY created_at DESC")
        .bind(supplier_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn update_status(
    conn: &mut SqliteConnection,
    order_pk: i64,
    status: OrderStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(order_pk)
        .execute(conn)
        .await?;
    Ok(())
}

/// One (order, line) pair for analytics flattening
#[derive(Debug, sqlx::FromRow)]
pub struct HistoricalLine {
    pub created_at: i64,
    pub item_id: i64,
    pub price: f64,
    pub quantity: i64,
}

/// All order lines in a creation window, oldest first. The candidate-item
/// intersection is applied by the analytics engine.
pub async fn lines_created_between(
    pool: &SqlitePool,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> Result<Vec<HistoricalLine>, sqlx::Error> {
    match (start_ms, end_ms) {
        (Some(start), Some(end)) => {
            sqlx::query_as(
                "SELECT o.created_at, l.item_id, l.price, l.quantity
                 FROM orders o JOIN order_lines l ON l.order_pk = o.id
                 WHERE o.created_at >= ?1 AND o.created_at <= ?2
                 ORDER BY o.created_at",
            )
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
        }
        _ => {
            sqlx::query_as(
                "SELECT o.created_at, l.item_id, l.price, l.quantity
                 FROM orders o JOIN order_lines l ON l.order_pk = o.id
                 ORDER BY o.created_at",
            )
            .fetch_all(pool)
            .await
        }
    }
}
