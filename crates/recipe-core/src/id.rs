//! Identifier newtypes for stored entities.
//!
//! Both IDs wrap the `i64` rowid allocated by the store, so a `RecipeId` cannot
//! be passed where an `IngredientId` is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(pub i64);

/// Identifier of a stored recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

// Display implementations -- just print the inner value.

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&RecipeId(7)).unwrap(), "7");
        let id: IngredientId = serde_json::from_str("42").unwrap();
        assert_eq!(id, IngredientId(42));
    }

    #[test]
    fn display_prints_inner_value() {
        assert_eq!(IngredientId(3).to_string(), "3");
        assert_eq!(RecipeId(11).to_string(), "11");
    }
}
