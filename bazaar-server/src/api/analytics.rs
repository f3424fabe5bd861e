//! Analytics API handlers
//!
//! Price analytics are for the buying side: vendors and admins only.

use axum::Json;
use axum::extract::{Query, State};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared::models::UserPublic;
use shared::{AppError, AppResult};

use crate::analytics::{
    self, Granularity, Insight, PricePoint, PriceStatistics, Recommendation, TrendFilter,
};
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db;
use crate::db::items::ItemRef;

// =============================================================================
// Query parameters
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub granularity: Option<String>,
    /// Accepted for wire compatibility; only actual prices are recorded
    #[allow(dead_code)]
    pub price_type: Option<String>,
    /// Comma-separated item ids
    pub products: Option<String>,
    /// Comma-separated category names
    pub categories: Option<String>,
    /// Comma-separated supplier ids
    pub suppliers: Option<String>,
}

fn parse_date(value: Option<&str>, field: &str) -> AppResult<Option<NaiveDate>> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                AppError::validation(format!("Invalid {field}, expected YYYY-MM-DD"))
                    .with_detail("field", field)
            }),
    }
}

fn split_ids(value: Option<&str>) -> Vec<i64> {
    value
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}

fn split_names(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl TrendQuery {
    fn into_filter(self) -> AppResult<TrendFilter> {
        let granularity = match self.granularity.as_deref() {
            None | Some("") => Granularity::default(),
            Some(g) => g
                .parse()
                .map_err(|e: String| AppError::validation(e).with_detail("field", "granularity"))?,
        };

        Ok(TrendFilter {
            start_date: parse_date(self.start_date.as_deref(), "startDate")?,
            end_date: parse_date(self.end_date.as_deref(), "endDate")?,
            granularity,
            products: split_ids(self.products.as_deref()),
            categories: split_names(self.categories.as_deref()),
            suppliers: split_ids(self.suppliers.as_deref()),
        })
    }
}

fn require_analytics_access(user: &CurrentUser) -> AppResult<()> {
    if !user.role.can_view_analytics() {
        return Err(AppError::forbidden("Access denied. Vendors and admins only."));
    }
    Ok(())
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTrendsResponse {
    pub success: bool,
    pub price_data: Vec<PricePoint>,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub success: bool,
    /// None when the filtered series is empty
    pub statistics: Option<PriceStatistics>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<ItemRef>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuppliersResponse {
    pub success: bool,
    pub suppliers: Vec<UserPublic>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/analytics/price-trends
pub async fn price_trends(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<PriceTrendsResponse>> {
    require_analytics_access(&user)?;

    let filter = query.into_filter()?;
    let price_data = analytics::compute_price_trends(&state.pool, &filter).await?;

    Ok(Json(PriceTrendsResponse {
        success: true,
        price_data,
    }))
}

/// GET /api/analytics/insights - statistics + insights + recommendations
/// over the same filtered series the trends endpoint serves
pub async fn insights(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<TrendQuery>,
) -> AppResult<Json<InsightsResponse>> {
    require_analytics_access(&user)?;

    let filter = query.into_filter()?;
    let series = analytics::compute_price_trends(&state.pool, &filter).await?;

    Ok(Json(InsightsResponse {
        success: true,
        statistics: analytics::compute_statistics(&series),
        insights: analytics::generate_insights(&series),
        recommendations: analytics::generate_recommendations(&series),
    }))
}

/// GET /api/analytics/products - filter lookup
pub async fn products(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<ProductsResponse>> {
    require_analytics_access(&user)?;

    let products = db::items::list_refs(&state.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(ProductsResponse {
        success: true,
        products,
    }))
}

/// GET /api/analytics/categories - filter lookup
pub async fn categories(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<CategoriesResponse>> {
    require_analytics_access(&user)?;

    let categories = db::items::distinct_categories(&state.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories,
    }))
}

/// GET /api/analytics/suppliers - filter lookup
pub async fn suppliers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<SuppliersResponse>> {
    require_analytics_access(&user)?;

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
