//! Domain model for the recipe catalogue.
//!
//! Holds the entity types (ingredients, recipes), input validation, paging,
//! and the search predicate compiler. Nothing here touches storage.
//!
//! # Modules
//!
//! - [`id`]: IngredientId, RecipeId newtypes
//! - [`ingredient`]: Ingredient entity
//! - [`recipe`]: Recipe entity, RecipeType, RecipeFields, IngredientChange
//! - [`criteria`]: SearchCriteria filters
//! - [`predicate`]: RecipePredicate compiled from criteria
//! - [`page`]: PageRequest, Page
//! - [`validate`]: field checks
//! - [`error`]: CoreError

pub mod criteria;
pub mod error;
pub mod id;
pub mod ingredient;
pub mod page;
pub mod predicate;
pub mod recipe;
pub mod validate;

// Re-export commonly used types
pub use criteria::SearchCriteria;
pub use error::CoreError;
pub use id::{IngredientId, RecipeId};
pub use ingredient::Ingredient;
pub use page::{Page, PageRequest};
pub use predicate::{Clause, RecipePredicate};
pub use recipe::{IngredientChange, Recipe, RecipeFields, RecipeSummary, RecipeType};
