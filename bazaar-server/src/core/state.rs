//! Application state

use std::sync::Arc;

use shared::AppResult;
use sqlx::SqlitePool;

use crate::auth::otp::{LogMailer, OtpMailer};
use crate::auth::{JwtConfig, JwtService};
use crate::core::Config;
use crate::db::DbService;

/// Shared application state — cheap to clone, one per process
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT token service
    pub jwt: Arc<JwtService>,
    /// OTP delivery collaborator
    pub mailer: Arc<dyn OtpMailer>,
}

impl AppState {
    /// Initialize state: open the database (running migrations) and build
    /// the JWT service from config. Uses the logging mailer; production
    /// deployments swap in a real delivery backend via [`with_mailer`].
    ///
    /// [`with_mailer`]: AppState::with_mailer
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;

        // First-run admin bootstrap, when configured
        if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
            crate::db::users::ensure_admin(&db.pool, email, password).await?;
        }

        let jwt = Arc::new(JwtService::with_config(JwtConfig {
            secret: config.jwt_secret.clone(),
            expiration_minutes: config.jwt_expiration_minutes,
            issuer: "bazaar-server".to_string(),
            audience: "bazaar-clients".to_string(),
        }));

        Ok(Self {
            config,
            pool: db.pool,
            jwt,
            mailer: Arc::new(LogMailer),
        })
    }

    /// Replace the OTP delivery collaborator
    pub fn with_mailer(mut self, mailer: Arc<dyn OtpMailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
