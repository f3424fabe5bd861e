//! Price-trend analytics
//!
//! Derived on demand from historical orders joined against the item
//! catalog; nothing here is persisted.

pub mod insights;
pub mod stats;
pub mod trends;

pub use insights::{Insight, Recommendation, generate_insights, generate_recommendations};
pub use stats::{PriceStatistics, compute_statistics};
pub use trends::{Granularity, PricePoint, TrendFilter, compute_price_trends};
