//! Sparse search filters over recipes.

use serde::{Deserialize, Serialize};

/// Optional recipe filters. Each present field narrows the result; absent
/// fields impose nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// `true` selects VEGETARIAN, `false` selects NON_VEGETARIAN.
    pub vegetarian: Option<bool>,
    /// Exact serving count.
    pub servings: Option<u32>,
    /// Case-insensitive substring of the instructions.
    pub instruction: Option<String>,
    /// Case-insensitive exact name of an attached ingredient.
    pub include_ingredient: Option<String>,
    /// Accepted for API compatibility; does not filter anything.
    pub exclude_ingredient: Option<String>,
}

impl SearchCriteria {
    /// True when no field would contribute a filter.
    pub fn is_unfiltered(&self) -> bool {
        self.vegetarian.is_none()
            && self.servings.is_none()
            && self.instruction.is_none()
            && self.include_ingredient.is_none()
    }
}
