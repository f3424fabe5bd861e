//! Rule-based market insights and buying recommendations
//!
//! Deterministic given identical input ordering. The thresholds are fixed
//! design constants; changing them changes user-visible behavior, so they
//! live in one place here.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::trends::PricePoint;

/// Recent/historical window split: last 30% vs first 70%
const RECENT_SHARE: f64 = 0.3;
const HISTORICAL_SHARE: f64 = 0.7;
/// Significant series-wide price change, percent
const SIGNIFICANT_CHANGE_PCT: f64 = 10.0;
/// Per-product trend flag threshold, percent
const PRODUCT_TREND_PCT: f64 = 15.0;
/// High/stable volatility as a share of the average price
const HIGH_VOLATILITY_RATIO: f64 = 0.20;
const STABLE_VOLATILITY_RATIO: f64 = 0.05;
/// Per-product volatility flag multiplier over the overall σ
const PRODUCT_VOLATILITY_MULTIPLIER: f64 = 1.5;
/// Buying recommendation thresholds
const BUY_NEAR_MIN_MULTIPLIER: f64 = 1.1;
const WAIT_NEAR_MAX_MULTIPLIER: f64 = 0.9;
const CONSIDER_BELOW_AVG_MULTIPLIER: f64 = 0.95;
/// Share of the series treated as "recent" for recommendations
const RECOMMENDATION_RECENT_SHARE: f64 = 0.8;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// One actionable market insight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub action: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuyingAction {
    Buy,
    Wait,
    Consider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Per-product buying recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product: String,
    pub action: BuyingAction,
    pub reason: String,
    pub confidence: Confidence,
    pub current_price: f64,
    pub avg_price: f64,
    /// Percent below the average, when buying now saves money
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings: Option<f64>,
    /// Percent above the average, when buying now costs extra
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64], mu: f64) -> f64 {
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Percent change of `current` vs `baseline`, 0 when the baseline is zero
fn pct_change(current: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        (current - baseline) / baseline * 100.0
    }
}

/// Round to one decimal place for display
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Complementary recent/historical windows over an ordered price list
fn split_windows(prices: &[f64]) -> (&[f64], &[f64]) {
    let n = prices.len();
    let recent_count = (n as f64 * RECENT_SHARE).floor() as usize;
    let historical_count = (n as f64 * HISTORICAL_SHARE).floor() as usize;
    (&prices[n - recent_count..], &prices[..historical_count])
}

/// Generate actionable insights over the ordered, bucketed series
pub fn generate_insights(data: &[PricePoint]) -> Vec<Insight> {
    if data.is_empty() {
        return Vec::new();
    }

    let mut insights = Vec::new();

    let prices: Vec<f64> = data.iter().map(|p| p.price).collect();
    let avg_price = mean(&prices);

    // Recent vs historical comparison
    let (recent, historical) = split_windows(&prices);
    if !recent.is_empty() && !historical.is_empty() {
        let change = pct_change(mean(recent), mean(historical));
        if change.abs() > SIGNIFICANT_CHANGE_PCT {
            let rising = change > 0.0;
            insights.push(Insight {
                kind: if rising {
                    InsightKind::Warning
                } else {
                    InsightKind::Success
                },
                title: format!(
                    "Significant Price {}",
                    if rising { "Increase" } else { "Decrease" }
                ),
                description: format!(
                    "Prices have {} by {:.1}% recently",
                    if rising { "increased" } else { "decreased" },
                    change.abs()
                ),
                action: if rising {
                    "Consider bulk purchasing before further increases".to_string()
                } else {
                    "Good time to increase inventory".to_string()
                },
                priority: Priority::High,
            });
        }
    }

    // Seasonal pattern: needs at least three distinct months
    let mut monthly: HashMap<u32, Vec<f64>> = HashMap::new();
    for point in data {
        if let Some(date) = parse_date(&point.date) {
            monthly.entry(date.month0()).or_default().push(point.price);
        }
    }
    if monthly.len() >= 3 {
        let mut monthly_avgs: Vec<(u32, f64)> =
            monthly.iter().map(|(m, p)| (*m, mean(p))).collect();
        monthly_avgs.sort_by(|a, b| a.1.total_cmp(&b.1));
        let cheapest = MONTH_NAMES[monthly_avgs[0].0 as usize];
        let expensive = MONTH_NAMES[monthly_avgs[monthly_avgs.len() - 1].0 as usize];

        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Seasonal Price Pattern".to_string(),
            description: format!(
                "Lowest prices typically in {}, highest in {}",
                cheapest, expensive
            ),
            action: format!("Plan purchases for {} to maximize savings", cheapest),
            priority: Priority::Medium,
        });
    }

    // Series-wide volatility
    let volatility = std_dev(&prices, avg_price);
    let volatility_pct = if avg_price == 0.0 {
        0.0
    } else {
        volatility / avg_price * 100.0
    };

    if volatility_pct > HIGH_VOLATILITY_RATIO * 100.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            title: "High Price Volatility".to_string(),
            description: format!(
                "Price volatility is {:.1}%, indicating unstable market conditions",
                volatility_pct
            ),
            action: "Consider smaller, more frequent orders to reduce risk".to_string(),
            priority: Priority::High,
        });
    } else if volatility_pct < STABLE_VOLATILITY_RATIO * 100.0 {
        insights.push(Insight {
            kind: InsightKind::Success,
            title: "Stable Market Conditions".to_string(),
            description: format!("Low volatility ({:.1}%) indicates stable pricing", volatility_pct),
            action: "Good time for bulk purchasing and long-term contracts".to_string(),
            priority: Priority::Low,
        });
    }

    // Per-product flags
    let mut order: Vec<&str> = Vec::new();
    let mut by_product: HashMap<&str, Vec<f64>> = HashMap::new();
    for point in data {
        by_product
            .entry(point.product_name.as_str())
            .or_insert_with(|| {
                order.push(point.product_name.as_str());
                Vec::new()
            })
            .push(point.price);
    }

    for name in order {
        let product_prices = &by_product[name];
        let product_avg = mean(product_prices);
        let product_volatility = std_dev(product_prices, product_avg);

        if product_volatility > volatility * PRODUCT_VOLATILITY_MULTIPLIER {
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: format!("{} - High Volatility", name),
                description: "This product shows higher than average price fluctuations"
                    .to_string(),
                action: "Monitor closely and consider alternative suppliers".to_string(),
                priority: Priority::Medium,
            });
        }

        let (recent, historical) = split_windows(product_prices);
        if !recent.is_empty() && !historical.is_empty() {
            let trend = pct_change(mean(recent), mean(historical));
            if trend > PRODUCT_TREND_PCT {
                insights.push(Insight {
                    kind: InsightKind::Warning,
                    title: format!("{} - Rising Prices", name),
                    description: format!("Prices increased by {:.1}% recently", trend),
                    action: "Consider stocking up or finding alternative suppliers".to_string(),
                    priority: Priority::High,
                });
            } else if trend < -PRODUCT_TREND_PCT {
                insights.push(Insight {
                    kind: InsightKind::Success,
                    title: format!("{} - Falling Prices", name),
                    description: format!("Prices decreased by {:.1}% recently", trend.abs()),
                    action: "Good opportunity to increase inventory".to_string(),
                    priority: Priority::Medium,
                });
            }
        }
    }

    // Weekday pattern: needs at least five distinct weekdays
    let mut weekly: HashMap<u32, Vec<f64>> = HashMap::new();
    for point in data {
        if let Some(date) = parse_date(&point.date) {
            weekly
                .entry(date.weekday().num_days_from_sunday())
                .or_default()
                .push(point.price);
        }
    }
    if weekly.len() >= 5 {
        let mut weekly_avgs: Vec<(u32, f64)> = weekly.iter().map(|(d, p)| (*d, mean(p))).collect();
        weekly_avgs.sort_by(|a, b| a.1.total_cmp(&b.1));
        let cheapest = DAY_NAMES[weekly_avgs[0].0 as usize];

        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Optimal Purchase Day".to_string(),
            description: format!("{} typically has the lowest prices", cheapest),
            action: format!("Schedule regular orders for {}s", cheapest),
            priority: Priority::Low,
        });
    }

    insights.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    insights
}

/// Generate per-product buying recommendations.
///
/// "Recent" is the last 20% of the whole ordered series by index; the
/// current price is the last recent observation for the product.
pub fn generate_recommendations(data: &[PricePoint]) -> Vec<Recommendation> {
    if data.is_empty() {
        return Vec::new();
    }

    let recent_start = (data.len() as f64 * RECOMMENDATION_RECENT_SHARE).floor() as usize;

    struct ProductPrices {
        prices: Vec<f64>,
        recent: Vec<f64>,
    }
    let mut order: Vec<&str> = Vec::new();
    let mut by_product: HashMap<&str, ProductPrices> = HashMap::new();

    for (index, point) in data.iter().enumerate() {
        let entry = by_product
            .entry(point.product_name.as_str())
            .or_insert_with(|| {
                order.push(point.product_name.as_str());
                ProductPrices {
                    prices: Vec::new(),
                    recent: Vec::new(),
                }
            });
        entry.prices.push(point.price);
        if index >= recent_start {
            entry.recent.push(point.price);
        }
    }

    let mut recommendations = Vec::new();

    for name in order {
        let product = &by_product[name];
        let avg_price = mean(&product.prices);
        let recent_avg = if product.recent.is_empty() {
            avg_price
        } else {
            mean(&product.recent)
        };
        let current_price = product.recent.last().copied().unwrap_or(avg_price);
        let min_price = product.prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_price = product
            .prices
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);

        if current_price <= min_price * BUY_NEAR_MIN_MULTIPLIER {
            recommendations.push(Recommendation {
                product: name.to_string(),
                action: BuyingAction::Buy,
                reason: "Near historical low".to_string(),
                confidence: Confidence::High,
                current_price,
                avg_price,
                savings: Some(round1(-pct_change(current_price, avg_price))),
                premium: None,
            });
        } else if current_price >= max_price * WAIT_NEAR_MAX_MULTIPLIER {
            recommendations.push(Recommendation {
                product: name.to_string(),
                action: BuyingAction::Wait,
                reason: "Near historical high".to_string(),
                confidence: Confidence::High,
                current_price,
                avg_price,
                savings: None,
                premium: Some(round1(pct_change(current_price, avg_price))),
            });
        } else if recent_avg < avg_price * CONSIDER_BELOW_AVG_MULTIPLIER {
            recommendations.push(Recommendation {
                product: name.to_string(),
                action: BuyingAction::Consider,
                reason: "Below average price".to_string(),
                confidence: Confidence::Medium,
                current_price,
                avg_price,
                savings: Some(round1(-pct_change(current_price, avg_price))),
                premium: None,
            });
        }
    }

    recommendations
}
