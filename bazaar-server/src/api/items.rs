//! Item API handlers (supplier catalog, owner-scoped)

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use validator::Validate;

use shared::models::{Item, ItemCreate, ItemUpdate, StockStatus};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db;

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub success: bool,
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub success: bool,
    pub item: Item,
}

/// Payload validation shared by create and update
#[derive(Debug, Validate)]
struct ItemFields<'a> {
    #[validate(length(min = 1, message = "Name is required"))]
    name: &'a str,
    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    price: f64,
    #[validate(range(min = 0, message = "Stock must be non-negative"))]
    stock: i64,
}

fn validate_fields(name: &str, price: f64, stock: i64) -> AppResult<()> {
    if !price.is_finite() {
        return Err(AppError::new(ErrorCode::ItemInvalidPrice));
    }
    ItemFields { name, price, stock }
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))
}

fn require_supplier(user: &CurrentUser) -> AppResult<()> {
    if !user.role.can_manage_items() {
        return Err(AppError::forbidden("Suppliers only"));
    }
    Ok(())
}

/// GET /api/items - the caller's own catalog
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ItemsResponse>> {
    require_supplier(&user)?;

    let items = db::items::list_for_supplier(&state.pool, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(ItemsResponse {
        success: true,
        items,
    }))
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<ItemCreate>,
) -> AppResult<Json<ItemResponse>> {
    require_supplier(&user)?;
    validate_fields(&payload.name, payload.price, payload.stock)?;

    let item = db::items::create(&state.pool, user.id, payload)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(item_id = item.id, supplier_id = user.id, name = %item.name, "Item created");

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

/// GET /api/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemResponse>> {
    require_supplier(&user)?;

    let item = db::items::find_for_supplier(&state.pool, id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound))?;
    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

/// PATCH /api/items/{id}
///
/// A stock write always recomputes the derived status in the same update.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<ItemResponse>> {
    require_supplier(&user)?;

    let mut item = db::items::find_for_supplier(&state.pool, id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::ItemNotFound))?;

    if let Some(name) = payload.name {
        item.name = name;
    }
    if let Some(category) = payload.category {
        item.category = category;
    }
    if let Some(unit) = payload.unit {
        item.unit = unit;
    }
    if let Some(price) = payload.price {
        item.price = price;
    }
    if let Some(stock) = payload.stock {
        item.stock = stock;
        item.status = StockStatus::from_stock(stock);
    }
    if let Some(description) = payload.description {
        item.description = Some(description);
    }
    if let Some(image) = payload.image {
        item.image = Some(image);
    }

    validate_fields(&item.name, item.price, item.stock)?;

    db::items::update(&state.pool, &item)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(item_id = item.id, supplier_id = user.id, "Item updated");

    Ok(Json(ItemResponse {
        success: true,
        item,
    }))
}

/// DELETE /api/items/{id}
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_supplier(&user)?;

    let deleted = db::items::delete(&state.pool, id, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ItemNotFound));
    }

    tracing::info!(item_id = id, supplier_id = user.id, "Item deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Item deleted successfully",
    })))
}
