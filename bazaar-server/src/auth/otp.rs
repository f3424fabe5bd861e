//! Email OTP verification codes
//!
//! Codes are generated here, argon2-hashed by the caller and persisted via
//! `db::verifications`. Delivery goes through the [`OtpMailer`]
//! collaborator so the server core never talks to a mail provider directly.

use async_trait::async_trait;
use shared::{AppError, AppResult, ErrorCode};

/// Code lifetime
pub const OTP_TTL_MINUTES: i64 = 10;
/// Verification attempts allowed per code
pub const MAX_ATTEMPTS: i64 = 3;

/// Generate a six-digit verification code
pub fn generate_code() -> String {
    use rand::Rng;
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    code.to_string()
}

/// OTP delivery collaborator
#[async_trait]
pub trait OtpMailer: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> AppResult<()>;
}

/// Development mailer: writes the code to the log instead of sending mail
pub struct LogMailer;

#[async_trait]
impl OtpMailer for LogMailer {
    async fn send_code(&self, email: &str, code: &str) -> AppResult<()> {
        tracing::info!(email = %email, code = %code, "OTP code (log delivery)");
        Ok(())
    }
}

/// Map a delivery failure into the unified error space
pub fn delivery_error(email: &str) -> AppError {
    AppError::new(ErrorCode::EmailDeliveryFailed).with_detail("email", email)
}
