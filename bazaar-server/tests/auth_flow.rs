//! Signup → OTP verification → login flow tests
//!
//! Handlers are called directly with extractor values; no HTTP stack
//! needed.

mod common;

use axum::Json;
use axum::extract::{Path, State};

use bazaar_server::api::{admin, auth};
use bazaar_server::db;
use shared::ErrorCode;
use shared::models::{Role, UserStatus};

use common::{capture_mailer, create_user, current, test_state};

fn signup_request(email: &str, role: &str) -> auth::SignupRequest {
    serde_json::from_value(serde_json::json!({
        "email": email,
        "password": "password123",
        "name": "Asha",
        "role": role,
    }))
    .unwrap()
}

#[tokio::test]
async fn vendor_signup_verify_login() {
    let (_dir, state) = test_state().await;
    let mailer = capture_mailer();
    let state = state.with_mailer(mailer.clone());

    // Signup leaves the account pending and unverified
    let response = auth::signup(
        State(state.clone()),
        Json(signup_request("asha@example.com", "vendor")),
    )
    .await
    .unwrap();
    assert!(response.0.success);

    let user = db::users::find_by_email(&state.pool, "asha@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.status, UserStatus::Pending);
    assert!(!user.email_verified);

    let code = mailer.last_code.lock().await.clone().expect("code sent");

    // The stored code is hashed, never plaintext
    let record = db::verifications::find(&state.pool, "asha@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(record.code, code);

    // Login before verification is rejected
    let err = auth::login(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
            "password": "password123",
        })).unwrap()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailNotVerified);

    // Verify with the delivered code
    auth::verify_otp(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
            "otp": code,
        })).unwrap()),
    )
    .await
    .unwrap();

    let user = db::users::find_by_email(&state.pool, "asha@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.email_verified);
    assert_eq!(user.status, UserStatus::Active);

    // Login issues a token the JWT service accepts
    let response = auth::login(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
            "password": "password123",
        })).unwrap()),
    )
    .await
    .unwrap();
    assert!(response.0.success);
    let claims = state.jwt.validate_token(&response.0.token).unwrap();
    assert_eq!(claims.role, "vendor");
}

#[tokio::test]
async fn wrong_code_attempts_are_limited() {
    let (_dir, state) = test_state().await;
    let mailer = capture_mailer();
    let state = state.with_mailer(mailer.clone());

    auth::signup(
        State(state.clone()),
        Json(signup_request("asha@example.com", "vendor")),
    )
    .await
    .unwrap();

    for _ in 0..3 {
        let err = auth::verify_otp(
            State(state.clone()),
            Json(serde_json::from_value(serde_json::json!({
                "email": "asha@example.com",
                "otp": "000000",
            })).unwrap()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::VerificationCodeInvalid);
    }

    // Even the right code is refused after the attempt cap
    let code = mailer.last_code.lock().await.clone().unwrap();
    let err = auth::verify_otp(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
            "otp": code,
        })).unwrap()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::TooManyAttempts);

    // A resent code resets the attempt counter
    auth::send_otp(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
        })).unwrap()),
    )
    .await
    .unwrap();
    let code = mailer.last_code.lock().await.clone().unwrap();
    auth::verify_otp(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
            "otp": code,
        })).unwrap()),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn supplier_requires_admin_approval() {
    let (_dir, state) = test_state().await;
    let mailer = capture_mailer();
    let state = state.with_mailer(mailer.clone());

    auth::signup(
        State(state.clone()),
        Json(signup_request("mandi@example.com", "supplier")),
    )
    .await
    .unwrap();

    let code = mailer.last_code.lock().await.clone().unwrap();
    auth::verify_otp(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "mandi@example.com",
            "otp": code,
        })).unwrap()),
    )
    .await
    .unwrap();

    // Verified but still pending: login stays closed
    let err = auth::login(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "mandi@example.com",
            "password": "password123",
        })).unwrap()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::AccountNotActive);

    // Admin approves; login opens
    let admin_user = create_user(&state.pool, "admin@example.com", Role::Admin, UserStatus::Active).await;
    let supplier = db::users::find_by_email(&state.pool, "mandi@example.com")
        .await
        .unwrap()
        .unwrap();

    admin::approve_supplier(State(state.clone()), current(&admin_user), Path(supplier.id))
        .await
        .unwrap();

    let response = auth::login(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "mandi@example.com",
            "password": "password123",
        })).unwrap()),
    )
    .await
    .unwrap();
    assert!(response.0.success);
}

#[tokio::test]
async fn duplicate_email_and_bad_role_are_rejected() {
    let (_dir, state) = test_state().await;
    let state = state.with_mailer(capture_mailer());

    auth::signup(
        State(state.clone()),
        Json(signup_request("asha@example.com", "vendor")),
    )
    .await
    .unwrap();

    let err = auth::signup(
        State(state.clone()),
        Json(signup_request("asha@example.com", "vendor")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmailExists);

    let err = auth::signup(
        State(state.clone()),
        Json(signup_request("root@example.com", "admin")),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let (_dir, state) = test_state().await;
    common::active_vendor(&state.pool, "asha@example.com").await;

    let err = auth::login(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "asha@example.com",
            "password": "wrong-password",
        })).unwrap()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);

    let err = auth::login(
        State(state.clone()),
        Json(serde_json::from_value(serde_json::json!({
            "email": "nobody@example.com",
            "password": "password123",
        })).unwrap()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidCredentials);
}
