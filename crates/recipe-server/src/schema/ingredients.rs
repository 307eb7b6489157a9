//! Ingredient request types.

use serde::Deserialize;

/// Request to create an ingredient.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIngredientRequest {
    /// Unique display name.
    pub name: String,
}
