//! Descriptive statistics over a bucketed price series
//!
//! Pure functions: same input series, same output — the handlers call
//! this on freshly computed trend data, tests call it on fixtures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::trends::PricePoint;

/// Direction of the price trend across the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Per-product volatility classification relative to the overall series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityFlag {
    /// σ above 1.5× the overall σ
    High,
    /// σ below 0.5× the overall σ
    Stable,
    Normal,
}

/// Per-product price statistics within the filtered series
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub name: String,
    pub category: String,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub volatility: f64,
    pub price_range: f64,
    pub data_points: usize,
    pub volatility_flag: VolatilityFlag,
}

/// Series-wide statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceStatistics {
    pub total_data_points: usize,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_range: f64,
    /// Population standard deviation of the reported prices
    pub volatility: f64,
    pub trend_direction: TrendDirection,
    pub trend_percentage: f64,
    pub products: Vec<ProductStats>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation: σ = sqrt(mean((x − μ)²))
fn std_dev(values: &[f64], mu: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compute statistics for a bucketed series.
///
/// Returns `None` for an empty series — the "no data" case short-circuits
/// here so NaN/Infinity never leak out of a division by zero.
pub fn compute_statistics(data: &[PricePoint]) -> Option<PriceStatistics> {
    if data.is_empty() {
        return None;
    }

    let prices: Vec<f64> = data.iter().map(|p| p.price).collect();
    let avg_price = mean(&prices);
    let min_price = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_price = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let volatility = std_dev(&prices, avg_price);

    // Trend: compare the mean of the second half against the first,
    // split at floor(n/2) by index.
    let half = prices.len() / 2;
    let (first_half, second_half) = prices.split_at(half);
    let (trend_direction, trend_percentage) = if first_half.is_empty() || second_half.is_empty() {
        (TrendDirection::Stable, 0.0)
    } else {
        let first = mean(first_half);
        let second = mean(second_half);
        let direction = if second > first {
            TrendDirection::Up
        } else if second < first {
            TrendDirection::Down
        } else {
            TrendDirection::Stable
        };
        let percentage = if first == 0.0 {
            0.0
        } else {
            (second - first) / first * 100.0
        };
        (direction, percentage)
    };

    // Per-product breakdown, in order of first appearance
    let mut order: Vec<&str> = Vec::new();
    let mut by_product: HashMap<&str, (Vec<f64>, &str)> = HashMap::new();
    for point in data {
        by_product
            .entry(point.product_name.as_str())
            .or_insert_with(|| {
                order.push(point.product_name.as_str());
                (Vec::new(), point.category.as_str())
            })
            .0
            .push(point.price);
    }

    let products = order
        .iter()
        .map(|name| {
            let (prices, category) = &by_product[name];
            let avg = mean(prices);
            let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let sigma = std_dev(prices, avg);

            let flag = if sigma > volatility * 1.5 {
                VolatilityFlag::High
            } else if sigma < volatility * 0.5 {
                VolatilityFlag::Stable
            } else {
                VolatilityFlag::Normal
            };

            ProductStats {
                name: name.to_string(),
                category: category.to_string(),
                avg_price: avg,
                min_price: min,
                max_price: max,
                volatility: sigma,
                price_range: max - min,
                data_points: prices.len(),
                volatility_flag: flag,
            }
        })
        .collect();

    Some(PriceStatistics {
        total_data_points: data.len(),
        avg_price,
        min_price,
        max_price,
        price_range: max_price - min_price,
        volatility,
        trend_direction,
        trend_percentage,
        products,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn point(date: &str, product: &str, price: f64) -> PricePoint {
        PricePoint {
            date: date.to_string(),
            price,
            avg_price: price,
            min_price: price,
            max_price: price,
            volume: 1,
            product_id: 1,
            product_name: product.to_string(),
            category: "vegetables".to_string(),
            supplier_id: 1,
        }
    }

    fn series(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| point(&format!("2025-07-{:02}", i + 1), "Onions", p))
            .collect()
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert!(compute_statistics(&[]).is_none());
    }

    #[test]
    fn test_step_series() {
        // [10,10,10,20,20,20]: avg 15, min 10, max 20,
        // halves average 10 and 20 -> up, +100%
        let stats = compute_statistics(&series(&[10.0, 10.0, 10.0, 20.0, 20.0, 20.0])).unwrap();

        assert_eq!(stats.avg_price, 15.0);
        assert_eq!(stats.min_price, 10.0);
        assert_eq!(stats.max_price, 20.0);
        assert_eq!(stats.trend_direction, TrendDirection::Up);
        assert_eq!(stats.trend_percentage, 100.0);
        // σ = sqrt(mean((x-15)^2)) = sqrt(25) = 5
        assert_eq!(stats.volatility, 5.0);
    }

    #[test]
    fn test_downward_trend() {
        let stats = compute_statistics(&series(&[20.0, 20.0, 10.0, 10.0])).unwrap();
        assert_eq!(stats.trend_direction, TrendDirection::Down);
        assert_eq!(stats.trend_percentage, -50.0);
    }

    #[test]
    fn test_flat_series_is_stable() {
        let stats = compute_statistics(&series(&[10.0, 10.0, 10.0, 10.0])).unwrap();
        assert_eq!(stats.trend_direction, TrendDirection::Stable);
        assert_eq!(stats.trend_percentage, 0.0);
        assert_eq!(stats.volatility, 0.0);
    }

    #[test]
    fn test_single_point_does_not_divide_by_zero() {
        let stats = compute_statistics(&series(&[10.0])).unwrap();
        assert_eq!(stats.trend_direction, TrendDirection::Stable);
        assert_eq!(stats.trend_percentage, 0.0);
        assert!(stats.trend_percentage.is_finite());
        assert!(stats.volatility.is_finite());
    }

    #[test]
    fn test_statistics_are_pure() {
        let data = series(&[10.0, 12.0, 11.0, 15.0, 14.0]);
        let a = compute_statistics(&data).unwrap();
        let b = compute_statistics(&data).unwrap();
        assert_eq!(a.avg_price, b.avg_price);
        assert_eq!(a.volatility, b.volatility);
        assert_eq!(a.trend_percentage, b.trend_percentage);
        assert_eq!(a.products.len(), b.products.len());
    }

    #[test]
    fn test_per_product_volatility_flags() {
        // Steady product dominating the series, plus a swinging one.
        // Overall σ ≈ 18.3; Rice σ = 0 (< 0.5×), Tomatoes σ = 29.5 (> 1.5×).
        let mut data = Vec::new();
        for i in 0..10 {
            data.push(point(&format!("2025-07-{:02}", i + 1), "Rice", 10.0));
        }
        for (i, price) in [1.0, 60.0, 1.0, 60.0].iter().enumerate() {
            data.push(point(&format!("2025-07-{:02}", i + 1), "Tomatoes", *price));
        }

        let stats = compute_statistics(&data).unwrap();
        let rice = stats.products.iter().find(|p| p.name == "Rice").unwrap();
        let tomatoes = stats
            .products
            .iter()
            .find(|p| p.name == "Tomatoes")
            .unwrap();

        assert_eq!(rice.volatility, 0.0);
        assert_eq!(rice.volatility_flag, VolatilityFlag::Stable);
        assert!(tomatoes.volatility > stats.volatility * 1.5);
        assert_eq!(tomatoes.volatility_flag, VolatilityFlag::High);
    }
}
