//! Category Domain Model

use serde::{Deserialize, Serialize};

use crate::id::CategoryId;

/// A browsing category listings are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend identifier of the category.
    pub category_id: CategoryId,

    /// Display name, e.g. "Textbooks".
    pub name: String,

    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,

    /// Optional icon name used by interfaces.
    #[serde(default)]
    pub icon: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn category_parses_without_optional_fields() {
        let json = r#"{"category_id": 2, "name": "Furniture"}"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.name, "Furniture");
        assert_eq!(category.description, None);
        assert_eq!(category.icon, None);
    }
}
