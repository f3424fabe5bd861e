//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Uniqueness is enforced on the normalized (trimmed, lowercased) name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// Normalize a category name for uniqueness comparison
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Vegetables "), "vegetables");
        assert_eq!(normalize_name("SPICES"), "spices");
        assert_eq!(normalize_name("dairy"), "dairy");
    }
}
