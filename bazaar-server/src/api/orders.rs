//! Order API handlers

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use shared::models::{Order, OrderStatus};
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db;
use crate::orders::PlaceOrderRequest;
use crate::orders::engine;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub order: Order,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub success: bool,
    pub orders: Vec<Order>,
    pub total_orders: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// POST /api/orders - vendors place orders
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<PlaceOrderResponse>> {
    if !user.role.can_place_orders() {
        return Err(AppError::forbidden("Only vendors can place orders"));
    }

    let order = engine::place_order(&state.pool, &user, payload).await?;

    Ok(Json(PlaceOrderResponse {
        success: true,
        order,
        message: "Order placed successfully".to_string(),
    }))
}

/// GET /api/orders - role-scoped listing, newest first
pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<OrdersResponse>> {
    let orders = engine::list_orders(&state.pool, &user).await?;
    let total_orders = orders.len();

    Ok(Json(OrdersResponse {
        success: true,
        orders,
        total_orders,
    }))
}

/// PATCH /api/orders/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let new_status: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidStatus).with_detail("status", payload.status.clone()))?;

    engine::update_status(&state.pool, &user, id, new_status).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Order status updated successfully",
    })))
}

/// GET /api/orders/{id} - detail view for a participant or admin
pub async fn get_by_id(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let row = db::orders::find_by_id(&state.pool, id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if !user.role.is_admin() && row.vendor_id != user.id && row.supplier_id != user.id {
        return Err(AppError::forbidden("Not allowed to view this order"));
    }

    let lines = db::orders::load_lines(&state.pool, row.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(row.into_order(lines)))
}
