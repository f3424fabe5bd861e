//! User Model
//!
//! One account table for all three roles. Role-specific behavior is
//! dispatched through [`Role`] capability checks rather than string
//! comparisons scattered through handlers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Supplier,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::Supplier => "supplier",
            Role::Admin => "admin",
        }
    }

    /// Admin accounts bypass most permission checks
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Vendors place orders against supplier catalogs
    pub fn can_place_orders(&self) -> bool {
        matches!(self, Role::Vendor)
    }

    /// Suppliers own and manage catalog items
    pub fn can_manage_items(&self) -> bool {
        matches!(self, Role::Supplier)
    }

    /// Price analytics are for the buying side (vendors) and admins
    pub fn can_view_analytics(&self) -> bool {
        matches!(self, Role::Vendor | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vendor" => Ok(Role::Vendor),
            "supplier" => Ok(Role::Supplier),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Account status
///
/// Vendors become `active` once their email is verified. Suppliers stay
/// `pending` until an admin approves them; declined suppliers cannot log in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Active,
    Declined,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
            UserStatus::Declined => "declined",
        }
    }
}

/// User entity (full row, password hash included)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub email_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User representation safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub email_verified: bool,
    pub created_at: i64,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            business_name: user.business_name,
            role: user.role,
            status: user.status,
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Vendor.can_place_orders());
        assert!(!Role::Supplier.can_place_orders());
        assert!(!Role::Admin.can_place_orders());

        assert!(Role::Supplier.can_manage_items());
        assert!(!Role::Admin.can_manage_items());
        assert!(!Role::Vendor.can_manage_items());

        assert!(Role::Vendor.can_view_analytics());
        assert!(Role::Admin.can_view_analytics());
        assert!(!Role::Supplier.can_view_analytics());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("vendor".parse::<Role>(), Ok(Role::Vendor));
        assert_eq!("supplier".parse::<Role>(), Ok(Role::Supplier));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("manager".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Vendor).unwrap(), "\"vendor\"");
        let role: Role = serde_json::from_str("\"supplier\"").unwrap();
        assert_eq!(role, Role::Supplier);
    }

    #[test]
    fn test_user_public_hides_password() {
        let user = User {
            id: 1,
            email: "v@example.com".into(),
            password_hash: "secret-hash".into(),
            name: "Vendor".into(),
            phone: None,
            business_name: None,
            role: Role::Vendor,
            status: UserStatus::Active,
            email_verified: true,
            created_at: 0,
            updated_at: 0,
        };

        let json = serde_json::to_string(&UserPublic::from(user)).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("v@example.com"));
    }
}
