//! Category catalog queries

use shared::models::Category;
use shared::models::category::normalize_name;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

pub async fn list(pool: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find_by_normalized_name(
    pool: &SqlitePool,
    name: &str,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE lower(trim(name)) = ?1")
        .bind(normalize_name(name))
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &SqlitePool, name: &str) -> Result<Category, sqlx::Error> {
    let id = snowflake_id();
    let now = now_millis();
    let name = name.trim().to_string();

    sqlx::query("INSERT INTO categories (id, name, created_at) VALUES (?1, ?2, ?3)")
        .bind(id)
        .bind(&name)
        .bind(now)
        .execute(pool)
        .await?;

    Ok(Category {
        id,
        name,
        created_at: now,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM categories WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Count of items referencing a category name (categories in use cannot be removed)
pub async fn item_count(pool: &SqlitePool, name: &str) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM items WHERE lower(trim(category)) = ?1")
            .bind(normalize_name(name))
            .fetch_one(pool)
            .await?;
    Ok(count)
}
