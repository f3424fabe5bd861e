//! Item Model
//!
//! Supplier-owned stock-keeping records. `status` is always a pure
//! function of `stock` — it is never written independently of a stock
//! write (see [`StockStatus::from_stock`]).

use serde::{Deserialize, Serialize};

/// Stock availability, derived from the stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OutOfStock,
}

impl StockStatus {
    /// The only way a status value should ever be produced
    pub fn from_stock(stock: i64) -> Self {
        if stock > 0 {
            StockStatus::InStock
        } else {
            StockStatus::OutOfStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

/// Item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub supplier_id: i64,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub price: f64,
    pub stock: i64,
    pub status: StockStatus,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreate {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub price: f64,
    pub stock: i64,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Update item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_pure_function_of_stock() {
        assert_eq!(StockStatus::from_stock(10), StockStatus::InStock);
        assert_eq!(StockStatus::from_stock(1), StockStatus::InStock);
        assert_eq!(StockStatus::from_stock(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_stock(-1), StockStatus::OutOfStock);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&StockStatus::OutOfStock).unwrap(),
            "\"out_of_stock\""
        );
        let status: StockStatus = serde_json::from_str("\"in_stock\"").unwrap();
        assert_eq!(status, StockStatus::InStock);
    }
}
