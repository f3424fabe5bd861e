//! Item catalog queries
//!
//! Stock movement goes through [`reserve_stock`] / [`release_stock`] so the
//! derived `status` column is recomputed from the new stock level in the
//! same statement that changes it.

use shared::models::{Item, ItemCreate, StockStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

pub async fn create(
    pool: &SqlitePool,
    supplier_id: i64,
    data: ItemCreate,
) -> Result<Item, sqlx::Error> {
    let id = snowflake_id();
    let now = now_millis();
    let status = StockStatus::from_stock(data.stock);

    sqlx::query(
        "INSERT INTO items (id, supplier_id, name, category, unit, price, stock, status,
                            description, image, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(supplier_id)
    .bind(&data.name)
    .bind(&data.category)
    .bind(&data.unit)
    .bind(data.price)
    .bind(data.stock)
    .bind(status)
    .bind(&data.description)
    .bind(&data.image)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(Item {
        id,
        supplier_id,
        name: data.name,
        category: data.category,
        unit: data.unit,
        price: data.price,
        stock: data.stock,
        status,
        description: data.description,
        image: data.image,
        created_at: now,
        updated_at: now,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM items WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Find an item scoped to its owning supplier (404 for anyone else's item)
pub async fn find_for_supplier(
    pool: &SqlitePool,
    id: i64,
    supplier_id: i64,
) -> Result<Option<Item>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM items WHERE id = ?1 AND supplier_id = ?2")
        .bind(id)
        .bind(supplier_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_supplier(
    pool: &SqlitePool,
    supplier_id: i64,
) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM items WHERE supplier_id = ?1 ORDER BY created_at DESC")
        .bind(supplier_id)
        .fetch_all(pool)
        .await
}

/// In-stock items of one supplier, for vendor browsing
pub async fn list_in_stock_for_supplier(
    pool: &SqlitePool,
    supplier_id: i64,
) -> Result<Vec<Item>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM items WHERE supplier_id = ?1 AND status = 'in_stock' ORDER BY name",
    )
    .bind(supplier_id)
    .fetch_all(pool)
    .await
}

/// Full update of the mutable fields. `stock` and `status` are written
/// together; callers pass a status derived via [`StockStatus::from_stock`].
pub async fn update(pool: &SqlitePool, item: &Item) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE items
         SET name = ?1, category = ?2, unit = ?3, price = ?4, stock = ?5, status = ?6,
             description = ?7, image = ?8, updated_at = ?9
         WHERE id = ?10",
    )
    .bind(&item.name)
    .bind(&item.category)
    .bind(&item.unit)
    .bind(item.price)
    .bind(item.stock)
    .bind(item.status)
    .bind(&item.description)
    .bind(&item.image)
    .bind(now_millis())
    .bind(item.id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64, supplier_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM items WHERE id = ?1 AND supplier_id = ?2")
        .bind(id)
        .bind(supplier_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Conditional stock decrement: succeeds only when enough stock remains.
///
/// Returns false (zero rows affected) when the item is gone or stock is
/// short — the caller rolls the surrounding transaction back. Two orders
/// racing over the same item can therefore never drive stock negative.
pub async fn reserve_stock(
    conn: &mut SqliteConnection,
    item_id: i64,
    quantity: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE items
         SET stock = stock - ?1,
             status = CASE WHEN stock - ?1 <= 0 THEN 'out_of_stock' ELSE 'in_stock' END,
             updated_at = ?2
         WHERE id = ?3 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(item_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Fresh name + stock inside an open transaction, for error reporting
/// after a failed reservation.
pub async fn name_and_stock(
    conn: &mut SqliteConnection,
    item_id: i64,
) -> Result<Option<(String, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT name, stock FROM items WHERE id = ?1")
        .bind(item_id)
        .fetch_optional(conn)
        .await
}

/// Give reserved stock back (order cancellation)
pub async fn release_stock(
    conn: &mut SqliteConnection,
    item_id: i64,
    quantity: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE items
         SET stock = stock + ?1,
             status = CASE WHEN stock + ?1 <= 0 THEN 'out_of_stock' ELSE 'in_stock' END,
             updated_at = ?2
         WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now_millis())
    .bind(item_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Candidate items for analytics, optionally limited to a creation window.
/// List filters (products/categories/suppliers) are applied by the caller.
pub async fn list_created_between(
    pool: &SqlitePool,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> Result<Vec<Item>, sqlx::Error> {
    match (start_ms, end_ms) {
        (Some(start), Some(end)) => {
            sqlx::query_as("SELECT * FROM items WHERE created_at >= ?1 AND created_at <= ?2")
                .bind(start)
                .bind(end)
                .fetch_all(pool)
                .await
        }
        _ => sqlx::query_as("SELECT * FROM items").fetch_all(pool).await,
    }
}

/// Lightweight projection for the analytics filter UI
#[derive(Debug, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub supplier_id: i64,
}

pub async fn list_refs(pool: &SqlitePool) -> Result<Vec<ItemRef>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, category, supplier_id FROM items ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn distinct_categories(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT category FROM items ORDER BY category")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}
