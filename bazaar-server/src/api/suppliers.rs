//! Supplier browsing handlers (vendor-facing)

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use shared::models::{Item, UserPublic};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db;

#[derive(Debug, Serialize)]
pub struct SuppliersResponse {
    pub success: bool,
    pub suppliers: Vec<UserPublic>,
}

#[derive(Debug, Serialize)]
pub struct SupplierItemsResponse {
    pub success: bool,
    pub items: Vec<Item>,
}

/// GET /api/suppliers - active suppliers
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> AppResult<Json<SuppliersResponse>> {
    let suppliers = db::users::list_active_suppliers(&state.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .into_iter()
        .map(UserPublic::from)
        .collect();

    Ok(Json(SuppliersResponse {
        success: true,
        suppliers,
    }))
}

/// GET /api/suppliers/{id}/items - one supplier's in-stock items
pub async fn list_items(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<SupplierItemsResponse>> {
    let supplier = db::users::find_by_id(&state.pool, id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|u| u.role == shared::models::Role::Supplier)
        .ok_or_else(|| AppError::new(ErrorCode::SupplierNotFound))?;

    let items = db::items::list_in_stock_for_supplier(&state.pool, supplier.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(SupplierItemsResponse {
        success: true,
        items,
    }))
}
