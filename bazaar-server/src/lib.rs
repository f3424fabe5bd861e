//! BazaarBuddy Server — marketplace backend for street-food vendors and
//! raw-material suppliers
//!
//! # Module structure
//!
//! ```text
//! bazaar-server/src/
//! ├── core/        # configuration, shared state
//! ├── auth/        # JWT, password hashing, OTP codes
//! ├── db/          # SQLite pool, per-domain queries, migrations
//! ├── orders/      # order engine and status machine
//! ├── analytics/   # price trends, statistics, insights
//! ├── api/         # HTTP routes and handlers
//! └── utils/       # logging
//! ```

pub mod analytics;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{AppState, Config};
pub use shared::{ApiResponse, AppError, AppResult, ErrorCode};
