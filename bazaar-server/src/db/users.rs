//! User account queries

use shared::models::{Role, User, UserStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

/// Fields needed to insert a new account
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub role: Role,
}

pub async fn create(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let id = snowflake_id();
    let now = now_millis();

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, phone, business_name,
                            role, status, email_verified, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending', 0, ?8, ?8)",
    )
    .bind(id)
    .bind(&new_user.email)
    .bind(&new_user.password_hash)
    .bind(&new_user.name)
    .bind(&new_user.phone)
    .bind(&new_user.business_name)
    .bind(new_user.role)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(User {
        id,
        email: new_user.email,
        password_hash: new_user.password_hash,
        name: new_user.name,
        phone: new_user.phone,
        business_name: new_user.business_name,
        role: new_user.role,
        status: UserStatus::Pending,
        email_verified: false,
        created_at: now,
        updated_at: now,
    })
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Mark email verified and move the account to its post-verification
/// status: vendors activate immediately, suppliers wait for admin approval.
pub async fn set_email_verified(pool: &SqlitePool, id: i64, role: Role) -> Result<(), sqlx::Error> {
    let status = match role {
        Role::Vendor | Role::Admin => UserStatus::Active,
        Role::Supplier => UserStatus::Pending,
    };
    sqlx::query("UPDATE users SET email_verified = 1, status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_status(pool: &SqlitePool, id: i64, status: UserStatus) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Create the bootstrap admin account if no account uses the email yet
pub async fn ensure_admin(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<(), shared::AppError> {
    let email = email.trim().to_lowercase();
    let existing = find_by_email(pool, &email)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash = crate::auth::password::hash_password(password)
        .map_err(|e| shared::AppError::internal(format!("Password hash error: {e}")))?;

    let admin = create(
        pool,
        NewUser {
            email: email.clone(),
            password_hash,
            name: "Admin".to_string(),
            phone: None,
            business_name: None,
            role: Role::Admin,
        },
    )
    .await
    .map_err(|e| shared::AppError::database(e.to_string()))?;

    set_email_verified(pool, admin.id, Role::Admin)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;

    tracing::info!(email = %email, "Bootstrap admin account created");
    Ok(())
}

/// All active suppliers, for vendor browsing
pub async fn list_active_suppliers(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM users WHERE role = 'supplier' AND status = 'active' ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Suppliers awaiting admin approval
pub async fn list_pending_suppliers(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM users
         WHERE role = 'supplier' AND status = 'pending' AND email_verified = 1
         ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
}
