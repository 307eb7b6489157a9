//! The recipe entity, its write payloads, and the flattened search projection.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::{IngredientId, RecipeId};
use crate::ingredient::Ingredient;
use crate::validate::{validate_instructions, validate_name, validate_servings};

/// Dietary classification of a recipe. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipeType {
    Vegetarian,
    NonVegetarian,
    Other,
}

impl RecipeType {
    /// The stored / wire spelling of this classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeType::Vegetarian => "VEGETARIAN",
            RecipeType::NonVegetarian => "NON_VEGETARIAN",
            RecipeType::Other => "OTHER",
        }
    }
}

impl fmt::Display for RecipeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VEGETARIAN" => Ok(RecipeType::Vegetarian),
            "NON_VEGETARIAN" => Ok(RecipeType::NonVegetarian),
            "OTHER" => Ok(RecipeType::Other),
            other => Err(CoreError::invalid(
                "type",
                format!("unknown recipe type '{other}'"),
            )),
        }
    }
}

/// The scalar fields of a recipe, overwritten as a whole on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFields {
    pub name: String,
    #[serde(rename = "type")]
    pub recipe_type: RecipeType,
    pub number_of_servings: u32,
    pub instructions: String,
}

impl RecipeFields {
    /// Runs every structural check on the fields.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name("name", &self.name)?;
        validate_servings(self.number_of_servings)?;
        validate_instructions(&self.instructions)
    }
}

/// What an update does to a recipe's ingredient set.
///
/// An absent list keeps the current set; a present list (even an empty one)
/// replaces it entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IngredientChange {
    #[default]
    Keep,
    Replace(Vec<IngredientId>),
}

impl From<Option<Vec<IngredientId>>> for IngredientChange {
    fn from(ids: Option<Vec<IngredientId>>) -> Self {
        match ids {
            Some(ids) => IngredientChange::Replace(ids),
            None => IngredientChange::Keep,
        }
    }
}

/// A stored recipe with its resolved ingredient set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    #[serde(rename = "type")]
    pub recipe_type: RecipeType,
    pub number_of_servings: u32,
    pub instructions: String,
    pub ingredients: BTreeSet<Ingredient>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Identifiers of the attached ingredients, ascending.
    pub fn ingredient_ids(&self) -> Vec<IngredientId> {
        self.ingredients.iter().map(|i| i.id).collect()
    }
}

/// Search result projection: ingredient names are flattened, no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    #[serde(rename = "type")]
    pub recipe_type: RecipeType,
    pub number_of_servings: u32,
    pub instructions: String,
    /// Ingredient names, sorted.
    pub ingredients: Vec<String>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        let mut ingredients: Vec<String> =
            recipe.ingredients.iter().map(|i| i.name.clone()).collect();
        ingredients.sort();
        RecipeSummary {
            id: recipe.id,
            name: recipe.name.clone(),
            recipe_type: recipe.recipe_type,
            number_of_servings: recipe.number_of_servings,
            instructions: recipe.instructions.clone(),
            ingredients,
        }
    }
}
