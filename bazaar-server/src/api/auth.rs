//! Auth API handlers
//!
//! Signup creates a pending account and sends a verification code.
//! Vendors activate as soon as the code checks out; suppliers additionally
//! wait for admin approval before they can log in.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use shared::models::{Role, UserPublic, UserStatus};
use shared::util::now_millis;
use shared::{AppError, AppResult, ErrorCode};

use crate::auth::otp::{MAX_ATTEMPTS, OTP_TTL_MINUTES, generate_code};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db;

// =============================================================================
// Request / Response types
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    /// "vendor" or "supplier"; admin accounts are never self-service
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

// =============================================================================
// Helpers
// =============================================================================

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash and store a fresh code, then hand it to the delivery collaborator
async fn issue_code(state: &AppState, email: &str) -> AppResult<()> {
    let code = generate_code();
    let code_hash =
        hash_password(&code).map_err(|e| AppError::internal(format!("Code hash error: {e}")))?;

    let now = now_millis();
    let expires_at = now + OTP_TTL_MINUTES * 60 * 1000;
    db::verifications::upsert(&state.pool, email, &code_hash, expires_at, now)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    state.mailer.send_code(email, &code).await
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let role: Role = req
        .role
        .parse()
        .map_err(|_| AppError::invalid_request(format!("Invalid role: {}", req.role)))?;
    if role == Role::Admin {
        return Err(AppError::invalid_request("Cannot sign up as admin"));
    }

    let email = normalize_email(&req.email);
    if db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailExists));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hash error: {e}")))?;

    let user = db::users::create(
        &state.pool,
        db::users::NewUser {
            email: email.clone(),
            password_hash,
            name: req.name,
            phone: req.phone,
            business_name: req.business_name,
            role,
        },
    )
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    issue_code(&state, &email).await?;

    tracing::info!(user_id = user.id, email = %email, role = %role, "Account registered, verification code sent");

    Ok(Json(SignupResponse {
        success: true,
        message: "Verification code sent to your email".to_string(),
        user_id: user.id,
    }))
}

/// POST /api/auth/send-otp - resend a verification code
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = normalize_email(&req.email);

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if user.email_verified {
        return Err(AppError::with_message(
            ErrorCode::AlreadyExists,
            "Email already verified",
        ));
    }

    issue_code(&state, &email).await?;

    tracing::info!(email = %email, "Verification code resent");

    Ok(Json(MessageResponse {
        success: true,
        message: "Verification code resent".to_string(),
    }))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = normalize_email(&req.email);
    let now = now_millis();

    let record = db::verifications::find(&state.pool, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotFound, "No verification pending for this email")
        })?;

    if now > record.expires_at {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }

    if record.attempts >= MAX_ATTEMPTS {
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }

    db::verifications::increment_attempts(&state.pool, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if !verify_password(&req.otp, &record.code) {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    db::users::set_email_verified(&state.pool, user.id, user.role)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let _ = db::verifications::delete(&state.pool, &email).await;

    tracing::info!(user_id = user.id, email = %email, "Email verified");

    let message = match user.role {
        Role::Supplier => "Email verified. Your account is awaiting admin approval.",
        _ => "Email verified successfully",
    };

    Ok(Json(MessageResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = normalize_email(&req.email);

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(target: "security", email = %email, "login_failed");
        return Err(AppError::invalid_credentials());
    }

    if !user.email_verified {
        return Err(AppError::new(ErrorCode::EmailNotVerified));
    }

    // Admins bypass the activation gate
    if user.role != Role::Admin && user.status != UserStatus::Active {
        return Err(AppError::with_message(
            ErrorCode::AccountNotActive,
            "Account is not active. Please contact admin.",
        ));
    }

    let token = state
        .jwt
        .generate_token(&user)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "Login");

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserPublic>> {
    let user = db::users::find_by_id(&state.pool, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user.into()))
}
