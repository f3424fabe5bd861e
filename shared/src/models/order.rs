//! Order Model
//!
//! An order is an immutable core (vendor, supplier, line snapshots,
//! total) plus a mutable fulfillment status. Status changes go through
//! the transition table on [`OrderStatus`]; nothing else may mutate a
//! persisted order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order fulfillment status
///
/// Lifecycle is a strict forward progression with cancellation reachable
/// from every non-terminal state:
///
/// ```text
/// pending -> accepted -> preparing -> out_for_delivery -> delivered
///     \__________\___________\______________\______> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The set of states legally reachable from this one
    pub fn legal_transitions(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Accepted, OrderStatus::Cancelled],
            OrderStatus::Accepted => &[OrderStatus::Preparing, OrderStatus::Cancelled],
            OrderStatus::Preparing => &[OrderStatus::OutForDelivery, OrderStatus::Cancelled],
            OrderStatus::OutForDelivery => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    /// Whether `next` is a legal transition from this state
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.legal_transitions().contains(&next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "accepted" => Ok(OrderStatus::Accepted),
            "preparing" => Ok(OrderStatus::Preparing),
            "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// One item-quantity-price snapshot within an order
///
/// `item_id` is a reference, not ownership: the snapshot fields keep the
/// line meaningful even if the live item is later edited or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub unit: String,
    pub total: f64,
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    /// Human-readable display id, e.g. `ORD-1234567890123`
    pub order_id: String,
    pub vendor_id: i64,
    pub supplier_id: i64,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub payment_method: String,
    pub delivery_address: String,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
