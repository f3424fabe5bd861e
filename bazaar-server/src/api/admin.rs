//! Admin API handlers: category catalog and supplier approval

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use shared::models::{Category, CategoryCreate, Role, UserPublic, UserStatus};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db;

fn require_admin(user: &CurrentUser) -> AppResult<()> {
    if !user.role.is_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: Category,
}

#[derive(Debug, Serialize)]
pub struct PendingSuppliersResponse {
    pub success: bool,
    pub suppliers: Vec<UserPublic>,
}

/// GET /api/admin/categories
pub async fn list_categories(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<CategoriesResponse>> {
    require_admin(&user)?;

    let categories = db::categories::list(&state.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<CategoryResponse>> {
    require_admin(&user)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Category name is required"));
    }

    if db::categories::find_by_normalized_name(&state.pool, name)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::CategoryNameExists).with_detail("name", name));
    }

    let category = db::categories::create(&state.pool, name)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok(Json(CategoryResponse {
        success: true,
        category,
    }))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&user)?;

    let category = db::categories::find_by_id(&state.pool, id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    let in_use = db::categories::item_count(&state.pool, &category.name)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if in_use > 0 {
        return Err(AppError::new(ErrorCode::CategoryInUse).with_detail("items", in_use));
    }

    db::categories::delete(&state.pool, id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Category deleted successfully",
    })))
}

/// GET /api/admin/suppliers/pending
pub async fn list_pending_suppliers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<PendingSuppliersResponse>> {
    require_admin(&user)?;

    let suppliers = db::users::list_pending_suppliers(&state.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .into_iter()
        .map(UserPublic::from)
        .collect();
    Ok(Json(PendingSuppliersResponse {
        success: true,
        suppliers,
    }))
}

async fn set_supplier_status(
    state: &AppState,
    supplier_id: i64,
    status: UserStatus,
) -> AppResult<UserPublic> {
    let supplier = db::users::find_by_id(&state.pool, supplier_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|u| u.role == Role::Supplier)
        .ok_or_else(|| AppError::new(ErrorCode::SupplierNotFound))?;

    db::users::set_status(&state.pool, supplier.id, status)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(supplier_id = supplier.id, status = %status.as_str(), "Supplier status updated");

    let mut public = UserPublic::from(supplier);
    public.status = status;
    Ok(public)
}

/// POST /api/admin/suppliers/{id}/approve
pub async fn approve_supplier(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&user)?;

    let supplier = set_supplier_status(&state, id, UserStatus::Active).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "supplier": supplier,
    })))
}

/// POST /api/admin/suppliers/{id}/decline
pub async fn decline_supplier(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&user)?;

    let supplier = set_supplier_status(&state, id, UserStatus::Declined).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "supplier": supplier,
    })))
}
