//! Proposed trait change.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TraitCategory;

/// A `(category, key, new value)` proposal coming from the sheet.
///
/// Scalar categories (Willpower, Humanity) carry their category name as key
/// so ledger entries always have something readable in `trait_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitChange {
    pub category: TraitCategory,
    pub key: String,
    pub new_value: i32,
}

impl TraitChange {
    pub fn new(category: TraitCategory, key: impl Into<String>, new_value: i32) -> Self {
        let key = if category.is_scalar() {
            category.as_str().to_string()
        } else {
            key.into()
        };
        Self {
            category,
            key,
            new_value,
        }
    }

    /// Change to a single-valued trait such as Willpower.
    pub fn scalar(category: TraitCategory, new_value: i32) -> Self {
        Self::new(category, category.as_str(), new_value)
    }
}

impl fmt::Display for TraitChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} -> {}", self.category, self.key, self.new_value)
    }
}
