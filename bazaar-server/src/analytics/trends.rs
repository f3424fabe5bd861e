//! Price-trend aggregation
//!
//! Joins historical order lines against the item catalog, buckets each
//! observation by time granularity and reduces each (bucket, product)
//! group to avg/min/max price and summed volume.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::models::Item;
use shared::{AppError, AppResult};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::db;

/// Time-bucket size for aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Daily
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            other => Err(format!("unknown granularity: {}", other)),
        }
    }
}

/// Analytics filter. Empty lists mean unrestricted.
#[derive(Debug, Clone, Default)]
pub struct TrendFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub granularity: Granularity,
    pub products: Vec<i64>,
    pub categories: Vec<String>,
    pub suppliers: Vec<i64>,
}

impl TrendFilter {
    /// Millisecond window [start, end]. Both dates must be present for the
    /// range to apply. The end date is inclusive (end of day).
    pub fn range_millis(&self) -> (Option<i64>, Option<i64>) {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => {
                let start_ms = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp_millis());
                let end_ms = end
                    .and_hms_opt(23, 59, 59)
                    .map(|t| t.and_utc().timestamp_millis() + 999);
                (start_ms, end_ms)
            }
            _ => (None, None),
        }
    }
}

/// One bucketed, aggregated price observation for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Bucket date, YYYY-MM-DD
    pub date: String,
    /// Reported scalar price — equals `avg_price` after grouping
    pub price: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub volume: i64,
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub supplier_id: i64,
}

/// Bucket a millisecond timestamp by granularity (UTC calendar)
pub fn bucket_date(ms: i64, granularity: Granularity) -> String {
    let date = DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.date_naive())
        .unwrap_or_default();

    let bucket = match granularity {
        Granularity::Daily => date,
        // Week starts on Sunday
        Granularity::Weekly => date - Duration::days(date.weekday().num_days_from_sunday() as i64),
        Granularity::Monthly => date.with_day(1).unwrap_or(date),
    };
    bucket.format("%Y-%m-%d").to_string()
}

fn item_matches(filter: &TrendFilter, item: &Item) -> bool {
    if !filter.products.is_empty() && !filter.products.contains(&item.id) {
        return false;
    }
    if !filter.categories.is_empty() && !filter.categories.contains(&item.category) {
        return false;
    }
    if !filter.suppliers.is_empty() && !filter.suppliers.contains(&item.supplier_id) {
        return false;
    }
    true
}

/// Compute the bucketed price series for the filtered item set.
///
/// An empty candidate set yields an empty series, not an error. Output is
/// sorted ascending by bucket date, ties broken by product id, so repeated
/// calls over the same data are deterministic.
pub async fn compute_price_trends(
    pool: &SqlitePool,
    filter: &TrendFilter,
) -> AppResult<Vec<PricePoint>> {
    let (start_ms, end_ms) = filter.range_millis();

    // 1. Candidate items
    let items = db::items::list_created_between(pool, start_ms, end_ms)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let candidates: HashMap<i64, Item> = items
        .into_iter()
        .filter(|i| item_matches(filter, i))
        .map(|i| (i.id, i))
        .collect();

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    // 2.+3. Candidate order lines, flattened to observations
    let lines = db::orders::lines_created_between(pool, start_ms, end_ms)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // 4.+5. Bucket and group by (bucket, product)
    struct Group {
        prices: Vec<f64>,
        volume: i64,
    }
    let mut groups: BTreeMap<(String, i64), Group> = BTreeMap::new();

    for line in lines {
        if !candidates.contains_key(&line.item_id) {
            continue;
        }
        let bucket = bucket_date(line.created_at, filter.granularity);
        let group = groups.entry((bucket, line.item_id)).or_insert(Group {
            prices: Vec::new(),
            volume: 0,
        });
        group.prices.push(line.price);
        group.volume += line.quantity;
    }

    // 6. Reduce each group; BTreeMap iteration is already (date, product) ascending
    let series = groups
        .into_iter()
        .map(|((date, product_id), group)| {
            let item = &candidates[&product_id];
            let count = group.prices.len() as f64;
            let avg = group.prices.iter().sum::<f64>() / count;
            let min = group.prices.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = group
                .prices
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max);

            PricePoint {
                date,
                price: avg,
                avg_price: avg,
                min_price: min,
                max_price: max,
                volume: group.volume,
                product_id,
                product_name: item.name.clone(),
                category: item.category.clone(),
                supplier_id: item.supplier_id,
            }
        })
        .collect();

    Ok(series)
}
