//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - signup, OTP verification, login
//! - [`items`] - supplier catalog management
//! - [`suppliers`] - vendor-facing supplier browsing
//! - [`orders`] - order placement and fulfillment
//! - [`analytics`] - price trends, statistics, insights
//! - [`admin`] - category catalog and supplier approval

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod health;
pub mod items;
pub mod orders;
pub mod suppliers;

use axum::routing::{delete, get, patch, post};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Auth (signup/login/OTP are public; token checks happen in the
        // CurrentUser extractor on every other handler)
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/send-otp", post(auth::send_otp))
        .route("/api/auth/verify-otp", post(auth::verify_otp))
        .route("/api/auth/me", get(auth::me))
        // Supplier catalog
        .route("/api/items", get(items::list).post(items::create))
        .route(
            "/api/items/{id}",
            get(items::get_by_id)
                .patch(items::update)
                .delete(items::remove),
        )
        // Vendor browsing
        .route("/api/suppliers", get(suppliers::list))
        .route("/api/suppliers/{id}/items", get(suppliers::list_items))
        // Orders
        .route("/api/orders", get(orders::list).post(orders::create))
        .route("/api/orders/{id}", get(orders::get_by_id))
        .route("/api/orders/{id}/status", patch(orders::update_status))
        // Analytics
        .route("/api/analytics/price-trends", get(analytics::price_trends))
        .route("/api/analytics/insights", get(analytics::insights))
        .route("/api/analytics/products", get(analytics::products))
        .route("/api/analytics/categories", get(analytics::categories))
        .route("/api/analytics/suppliers", get(analytics::suppliers))
        // Admin
        .route(
            "/api/admin/categories",
            get(admin::list_categories).post(admin::create_category),
        )
        .route("/api/admin/categories/{id}", delete(admin::delete_category))
        .route(
            "/api/admin/suppliers/pending",
            get(admin::list_pending_suppliers),
        )
        .route(
            "/api/admin/suppliers/{id}/approve",
            post(admin::approve_supplier),
        )
        .route(
            "/api/admin/suppliers/{id}/decline",
            post(admin::decline_supplier),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Lightweight request log line alongside the tower-http trace spans
async fn log_requests(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = next.run(req).await;
    tracing::debug!(%method, %path, status = %response.status(), "request");
    response
}
