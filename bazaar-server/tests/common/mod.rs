//! Shared test fixtures: a temp-file SQLite pool with migrations applied
//! and account/item helpers.
#![allow(dead_code)]

use std::sync::Arc;

use bazaar_server::auth::CurrentUser;
use bazaar_server::auth::otp::OtpMailer;
use bazaar_server::auth::password::hash_password;
use bazaar_server::core::{AppState, Config};
use bazaar_server::db;
use shared::AppResult;
use shared::models::{Item, ItemCreate, Role, User, UserStatus};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::sync::Mutex;

/// Fresh state over a temp-file database. The TempDir must stay alive for
/// the duration of the test.
pub async fn test_state() -> (TempDir, AppState) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("test.db");

    let config = Config {
        database_path: db_path.to_string_lossy().into_owned(),
        http_port: 0,
        environment: "development".to_string(),
        jwt_secret: "test-secret-that-is-long-enough!".to_string(),
        jwt_expiration_minutes: 60,
        admin_email: None,
        admin_password: None,
    };

    let state = AppState::new(config).await.expect("init state");
    (dir, state)
}

pub async fn test_pool() -> (TempDir, SqlitePool) {
    let (dir, state) = test_state().await;
    (dir, state.pool)
}

/// Mailer that captures the last code instead of delivering it
#[derive(Default)]
pub struct CaptureMailer {
    pub last_code: Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl OtpMailer for CaptureMailer {
    async fn send_code(&self, _email: &str, code: &str) -> AppResult<()> {
        *self.last_code.lock().await = Some(code.to_string());
        Ok(())
    }
}

pub async fn create_user(pool: &SqlitePool, email: &str, role: Role, status: UserStatus) -> User {
    let user = db::users::create(
        pool,
        db::users::NewUser {
            email: email.to_string(),
            password_hash: hash_password("password123").unwrap(),
            name: email.split('@').next().unwrap_or("user").to_string(),
            phone: None,
            business_name: None,
            role,
        },
    )
    .await
    .expect("create user");

    if status == UserStatus::Active {
        db::users::set_email_verified(pool, user.id, role).await.unwrap();
        db::users::set_status(pool, user.id, UserStatus::Active)
            .await
            .unwrap();
    }

    db::users::find_by_id(pool, user.id).await.unwrap().unwrap()
}

pub async fn active_vendor(pool: &SqlitePool, email: &str) -> User {
    create_user(pool, email, Role::Vendor, UserStatus::Active).await
}

pub async fn active_supplier(pool: &SqlitePool, email: &str) -> User {
    create_user(pool, email, Role::Supplier, UserStatus::Active).await
}

pub fn current(user: &User) -> CurrentUser {
    CurrentUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

pub async fn create_item(
    pool: &SqlitePool,
    supplier_id: i64,
    name: &str,
    category: &str,
    price: f64,
    stock: i64,
) -> Item {
    db::items::create(
        pool,
        supplier_id,
        ItemCreate {
            name: name.to_string(),
            category: category.to_string(),
            unit: "kg".to_string(),
            price,
            stock,
            description: None,
            image: None,
        },
    )
    .await
    .expect("create item")
}

pub fn capture_mailer() -> Arc<CaptureMailer> {
    Arc::new(CaptureMailer::default())
}
