//! Logging Infrastructure
//!
//! Structured logging setup for development and production.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Production gets JSON lines
/// for log shipping; development keeps the human-readable format.
pub fn init_logger(environment: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bazaar_server=info,tower_http=info".into());

    if environment == "production" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
