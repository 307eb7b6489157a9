//! Recipe request types.
//!
//! The recipe type and serving count arrive loosely typed and are converted
//! through [`RecipeBody::into_fields`], so a bad value is reported as a
//! field-level `400` rather than a body-parse rejection.

use serde::Deserialize;

use recipe_core::{CoreError, IngredientChange, IngredientId, RecipeFields, SearchCriteria};

/// The overwrite payload shared by create and update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeBody {
    pub name: String,
    #[serde(rename = "type")]
    pub recipe_type: String,
    pub number_of_servings: i64,
    pub instructions: String,
    /// Absent or `null` keeps the current set on update.
    #[serde(default)]
    pub ingredient_ids: Option<Vec<IngredientId>>,
}

impl RecipeBody {
    /// Splits the body into validated-by-type fields and the ingredient list.
    pub fn into_fields(self) -> Result<(RecipeFields, Option<Vec<IngredientId>>), CoreError> {
        let recipe_type = self.recipe_type.parse()?;
        let number_of_servings =
            u32::try_from(self.number_of_servings).map_err(|_| CoreError::InvalidArgument {
                field: "numberOfServings",
                reason: format!("must be at least 1, got {}", self.number_of_servings),
            })?;
        let fields = RecipeFields {
            name: self.name,
            recipe_type,
            number_of_servings,
            instructions: self.instructions,
        };
        Ok((fields, self.ingredient_ids))
    }
}

/// `POST /recipe`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(flatten)]
    pub body: RecipeBody,
}

/// `PATCH /recipe`: the target id travels in the body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecipeRequest {
    pub id: i64,
    #[serde(flatten)]
    pub body: RecipeBody,
}

impl UpdateRecipeRequest {
    pub fn into_parts(self) -> Result<(RecipeFields, IngredientChange), CoreError> {
        let (fields, ids) = self.body.into_fields()?;
        Ok((fields, IngredientChange::from(ids)))
    }
}

fn default_size() -> u32 {
    10
}

/// Query string of `GET /recipe/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
    pub vegetarian: Option<bool>,
    pub servings: Option<u32>,
    pub include_ingredient: Option<String>,
    pub exclude_ingredient: Option<String>,
    pub instruction: Option<String>,
}

impl SearchParams {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            vegetarian: self.vegetarian,
            servings: self.servings,
            instruction: self.instruction.clone(),
            include_ingredient: self.include_ingredient.clone(),
            exclude_ingredient: self.exclude_ingredient.clone(),
        }
    }
}
