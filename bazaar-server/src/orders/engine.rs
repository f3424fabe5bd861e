//! Order engine
//!
//! Validates and creates orders against live item state, and drives the
//! fulfillment status machine. All stock movement happens inside a single
//! transaction with the order write: the conditional decrement in
//! `db::items::reserve_stock` makes overselling impossible even under
//! concurrent placement.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::Deserialize;

use shared::models::{Order, OrderLine, OrderStatus, Role};
use shared::util::{now_millis, snowflake_id};
use shared::{AppError, AppResult, ErrorCode};
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db;

/// One requested line: which item, how many units
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub item_id: i64,
    pub quantity: i64,
}

/// Order placement request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub supplier_id: i64,
    pub items: Vec<OrderLineInput>,
    pub delivery_address: String,
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    "cash".to_string()
}

/// Exact line total: price × quantity, 2 decimal places
fn line_total(price: f64, quantity: i64) -> Decimal {
    let price = Decimal::from_f64(price).unwrap_or_default();
    (price * Decimal::from(quantity)).round_dp(2)
}

/// Place an order for `vendor`.
///
/// Validation happens up front and fails fast with a distinct error per
/// condition; no mutation is attempted until every line has been checked.
/// The commit re-checks stock with a conditional decrement, so a
/// concurrent order racing through the same items simply loses and rolls
/// back.
pub async fn place_order(
    pool: &SqlitePool,
    vendor: &CurrentUser,
    req: PlaceOrderRequest,
) -> AppResult<Order> {
    // -- Validation --

    if req.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }

    for line in &req.items {
        if line.quantity <= 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity)
                .with_detail("item_id", line.item_id)
                .with_detail("quantity", line.quantity));
        }
    }

    let delivery_address = req.delivery_address.trim().to_string();
    if delivery_address.is_empty() {
        return Err(AppError::new(ErrorCode::DeliveryAddressRequired));
    }

    let supplier = db::users::find_by_id(pool, req.supplier_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .filter(|u| u.role == Role::Supplier)
        .ok_or_else(|| AppError::new(ErrorCode::SupplierNotFound))?;

    // Resolve every item, snapshot price/name/unit, accumulate the total.
    // Items must belong to the requested supplier.
    let mut lines = Vec::with_capacity(req.items.len());
    let mut total = Decimal::ZERO;

    for line in &req.items {
        let item = db::items::find_by_id(pool, line.item_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .filter(|i| i.supplier_id == supplier.id)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::ItemNotFound,
                    format!(
                        "Item {} not found or doesn't belong to supplier",
                        line.item_id
                    ),
                )
            })?;

        if item.stock < line.quantity {
            return Err(AppError::insufficient_stock(
                item.name,
                item.stock,
                line.quantity,
            ));
        }

        let line_total = line_total(item.price, line.quantity);
        total += line_total;

        lines.push(OrderLine {
            item_id: item.id,
            name: item.name,
            price: item.price,
            quantity: line.quantity,
            unit: item.unit,
            total: line_total.to_f64().unwrap_or(0.0),
        });
    }

    let id = snowflake_id();
    let now = now_millis();
    let order = Order {
        id,
        order_id: format!("ORD-{}", id),
        vendor_id: vendor.id,
        supplier_id: supplier.id,
        items: lines,
        total_amount: total.to_f64().unwrap_or(0.0),
        payment_method: req.payment_method,
        delivery_address,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    // -- Commit: reserve stock and write the order atomically --

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    for line in &order.items {
        let reserved = db::items::reserve_stock(&mut *tx, line.item_id, line.quantity)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if !reserved {
            // Someone got here first; report the stock as it is now.
            let (name, available) = db::items::name_and_stock(&mut *tx, line.item_id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?
                .unwrap_or_else(|| (line.name.clone(), 0));
            tx.rollback()
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            return Err(AppError::insufficient_stock(name, available, line.quantity));
        }
    }

    db::orders::insert(&mut *tx, &order)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        order_id = %order.order_id,
        vendor_id = order.vendor_id,
        supplier_id = order.supplier_id,
        total = order.total_amount,
        lines = order.items.len(),
        "Order placed"
    );

    Ok(order)
}

/// Orders visible to the caller: vendors see their purchases, suppliers
/// their sales, admins everything. Newest first.
pub async fn list_orders(pool: &SqlitePool, user: &CurrentUser) -> AppResult<Vec<Order>> {
    let rows = match user.role {
        Role::Vendor => db::orders::list_for_vendor(pool, user.id).await,
        Role::Supplier => db::orders::list_for_supplier(pool, user.id).await,
        Role::Admin => db::orders::list_all(pool).await,
    }
    .map_err(|e| AppError::database(e.to_string()))?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let lines = db::orders::load_lines(pool, row.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        orders.push(row.into_order(lines));
    }
    Ok(orders)
}

/// Apply a status transition to an order.
///
/// The transition must be legal per [`OrderStatus::legal_transitions`].
/// Suppliers advance their own orders; vendors may only cancel their own
/// pending order; admins may do either. Cancellation releases the
/// reserved stock back to each line's item in the same transaction.
pub async fn update_status(
    pool: &SqlitePool,
    user: &CurrentUser,
    order_pk: i64,
    new_status: OrderStatus,
) -> AppResult<Order> {
    let row = db::orders::find_by_id(pool, order_pk)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let permitted = match user.role {
        Role::Admin => true,
        Role::Supplier => row.supplier_id == user.id,
        Role::Vendor => {
            row.vendor_id == user.id
                && new_status == OrderStatus::Cancelled
                && row.status == OrderStatus::Pending
        }
    };
    if !permitted {
        return Err(AppError::forbidden("Not allowed to update this order"));
    }

    if !row.status.can_transition_to(new_status) {
        return Err(AppError::new(ErrorCode::InvalidTransition)
            .with_detail("from", row.status.as_str())
            .with_detail("to", new_status.as_str()));
    }

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    db::orders::update_status(&mut *tx, row.id, new_status)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let lines = db::orders::load_lines_tx(&mut *tx, row.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Cancellation returns the reserved units to stock
    if new_status == OrderStatus::Cancelled {
        for line in &lines {
            db::items::release_stock(&mut *tx, line.item_id, line.quantity)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
        }
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        order_id = %row.order_id,
        from = %row.status,
        to = %new_status,
        "Order status updated"
    );

    let mut order = row.into_order(lines);
    order.status = new_status;
    order.updated_at = now_millis();
    Ok(order)
}
