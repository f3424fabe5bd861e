//! Shared types for the BazaarBuddy marketplace
//!
//! Common types used across crates: domain models, unified error
//! codes and response structures, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
