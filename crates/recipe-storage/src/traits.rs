//! The storage contract for ingredients and recipes.
//!
//! Two layers:
//! - [`IngredientStore`] and [`RecipeStore`] are the per-entity operations,
//!   implemented by each backend's session type.
//! - [`Store`] opens a unit of work: a [`Session`] whose writes become visible
//!   only if the closure returns `Ok`.
//!
//! All backends (InMemoryStore, SqliteStore) implement this contract with
//! identical semantics, so the service layer never knows which one it has.

use std::collections::BTreeSet;

use recipe_core::{
    Ingredient, IngredientId, Page, PageRequest, Recipe, RecipeFields, RecipeId, RecipePredicate,
};

use crate::error::StorageError;

/// Persistence of ingredient records.
pub trait IngredientStore {
    /// Inserts a new ingredient, allocating a fresh identifier and timestamps.
    ///
    /// Fails with [`StorageError::ConstraintViolation`] if the name is taken.
    fn save_ingredient(&mut self, name: &str) -> Result<Ingredient, StorageError>;

    /// Looks up an ingredient by identifier.
    fn find_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, StorageError>;

    /// Returns one page of ingredients ordered by identifier.
    fn find_all_ingredients(&self, page: PageRequest) -> Result<Page<Ingredient>, StorageError>;

    fn ingredient_exists(&self, id: IngredientId) -> Result<bool, StorageError>;

    /// Deletes an ingredient and detaches it from every recipe that used it.
    ///
    /// Callers check existence first; deleting a missing id is not an error.
    fn delete_ingredient(&mut self, id: IngredientId) -> Result<(), StorageError>;
}

/// Persistence of recipe records and their ingredient associations.
pub trait RecipeStore {
    /// Inserts a new recipe with the given ingredient set.
    ///
    /// Fails with [`StorageError::ConstraintViolation`] if the name is taken.
    fn insert_recipe(
        &mut self,
        fields: &RecipeFields,
        ingredients: &BTreeSet<Ingredient>,
    ) -> Result<Recipe, StorageError>;

    /// Overwrites an existing recipe's fields and, when `ingredients` is
    /// `Some`, replaces its ingredient set. `None` leaves the set untouched.
    fn update_recipe(
        &mut self,
        id: RecipeId,
        fields: &RecipeFields,
        ingredients: Option<&BTreeSet<Ingredient>>,
    ) -> Result<Recipe, StorageError>;

    /// Looks up a recipe, with its ingredients, by identifier.
    fn find_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, StorageError>;

    /// Returns one page of recipes ordered by identifier.
    fn find_all_recipes(&self, page: PageRequest) -> Result<Page<Recipe>, StorageError>;

    fn recipe_exists(&self, id: RecipeId) -> Result<bool, StorageError>;

    /// Deletes a recipe and its ingredient associations (not the ingredients).
    fn delete_recipe(&mut self, id: RecipeId) -> Result<(), StorageError>;

    /// Returns one page of the recipes matching `predicate`, each at most
    /// once, ordered by name ascending.
    fn search_recipes(
        &self,
        predicate: &RecipePredicate,
        page: PageRequest,
    ) -> Result<Page<Recipe>, StorageError>;
}

/// Both entity stores, as seen from inside one unit of work.
pub trait Session: IngredientStore + RecipeStore {}

impl<T: IngredientStore + RecipeStore + ?Sized> Session for T {}

/// A backend that can run atomic units of work.
pub trait Store {
    /// Runs `work` against a fresh session. Everything it wrote is committed
    /// if it returns `Ok` and discarded if it returns `Err`.
    fn unit_of_work<T, F>(&mut self, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn Session) -> Result<T, StorageError>;
}
