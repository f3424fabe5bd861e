//! Server configuration

use shared::{AppError, AppResult, ErrorCode};

/// Server configuration, loaded from environment variables
///
/// | Env var | Default | Notes |
/// |---------|---------|-------|
/// | DATABASE_PATH | bazaar.db | SQLite file path |
/// | HTTP_PORT | 3000 | |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | dev placeholder | required outside development |
/// | JWT_EXPIRATION_MINUTES | 1440 | |
/// | ADMIN_EMAIL / ADMIN_PASSWORD | unset | bootstrap admin on startup |
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file path
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT lifetime in minutes
    pub jwt_expiration_minutes: i64,
    /// Bootstrap admin account, created on startup when missing
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty outside development.
    fn require_secret(name: &str, environment: &str) -> AppResult<String> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(AppError::with_message(
                        ErrorCode::ConfigError,
                        format!("{name} must be set in {environment} environment"),
                    ));
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!("{name} must not be empty in {environment} environment"),
            ));
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "bazaar.db".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(1440),
            admin_email: std::env::var("ADMIN_EMAIL").ok().filter(|s| !s.is_empty()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
