//! RecipeService: the single coordinator between front ends (HTTP handlers,
//! the CLI) and the storage crate.
//!
//! Every public operation validates its input first and then runs as exactly
//! one unit of work, so a failure part way through (an unknown ingredient id,
//! a duplicate name) leaves nothing persisted. Errors are the storage taxonomy
//! unchanged; front ends decide how to present them.

use recipe_core::validate::validate_name;
use recipe_core::{
    Ingredient, IngredientChange, IngredientId, Page, PageRequest, Recipe, RecipeFields,
    RecipeId, RecipePredicate, RecipeSummary, SearchCriteria,
};
use recipe_storage::{resolve_ingredients, SqliteStore, StorageError, Store};

/// Orchestrates ingredient and recipe operations over a [`Store`].
pub struct RecipeService<S> {
    store: S,
}

impl RecipeService<SqliteStore> {
    /// Opens a service over the SQLite database at `db_path`.
    pub fn open(db_path: &str) -> Result<Self, StorageError> {
        Ok(RecipeService::new(SqliteStore::new(db_path)?))
    }

    /// Opens a service over a private in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(RecipeService::new(SqliteStore::in_memory()?))
    }
}

impl<S: Store> RecipeService<S> {
    pub fn new(store: S) -> Self {
        RecipeService { store }
    }

    // -------------------------------------------------------------------
    // Ingredients
    // -------------------------------------------------------------------

    /// Creates an ingredient. Name uniqueness is enforced by the store.
    pub fn create_ingredient(&mut self, name: &str) -> Result<IngredientId, StorageError> {
        validate_name("name", name)?;
        let ingredient = self.store.unit_of_work(|s| s.save_ingredient(name))?;
        tracing::info!(id = %ingredient.id, name, "created ingredient");
        Ok(ingredient.id)
    }

    pub fn get_ingredient(&mut self, id: IngredientId) -> Result<Ingredient, StorageError> {
        self.store
            .unit_of_work(|s| s.find_ingredient(id))?
            .ok_or_else(|| StorageError::ingredient_not_found(id))
    }

    /// Lists ingredients by identifier, one page at a time.
    pub fn list_ingredients(
        &mut self,
        page: u32,
        size: u32,
    ) -> Result<Page<Ingredient>, StorageError> {
        let request = PageRequest::new(page, size)?;
        let listed = self.store.unit_of_work(|s| s.find_all_ingredients(request))?;
        tracing::debug!(page, size, returned = listed.content.len(), "listed ingredients");
        Ok(listed)
    }

    /// Deletes an ingredient, detaching it from every recipe that used it.
    pub fn delete_ingredient(&mut self, id: IngredientId) -> Result<(), StorageError> {
        self.store.unit_of_work(|s| {
            if !s.ingredient_exists(id)? {
                return Err(StorageError::ingredient_not_found(id));
            }
            s.delete_ingredient(id)
        })?;
        tracing::info!(id = %id, "deleted ingredient");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Recipes
    // -------------------------------------------------------------------

    /// Creates a recipe. When `ingredient_ids` is present every id must
    /// resolve, or nothing is written.
    pub fn create_recipe(
        &mut self,
        fields: &RecipeFields,
        ingredient_ids: Option<&[IngredientId]>,
    ) -> Result<RecipeId, StorageError> {
        fields.validate()?;
        let recipe = self.store.unit_of_work(|s| {
            let ingredients = match ingredient_ids {
                Some(ids) => resolve_ingredients(&*s, ids)?,
                None => Default::default(),
            };
            s.insert_recipe(fields, &ingredients)
        })?;
        tracing::info!(
            id = %recipe.id,
            name = %recipe.name,
            ingredients = recipe.ingredients.len(),
            "created recipe"
        );
        Ok(recipe.id)
    }

    pub fn get_recipe(&mut self, id: RecipeId) -> Result<Recipe, StorageError> {
        self.store
            .unit_of_work(|s| s.find_recipe(id))?
            .ok_or_else(|| StorageError::recipe_not_found(id))
    }

    /// Overwrites a recipe's fields. The ingredient set is replaced only for
    /// [`IngredientChange::Replace`]; an empty replacement clears it.
    pub fn update_recipe(
        &mut self,
        id: RecipeId,
        fields: &RecipeFields,
        change: &IngredientChange,
    ) -> Result<Recipe, StorageError> {
        fields.validate()?;
        let recipe = self.store.unit_of_work(|s| {
            if !s.recipe_exists(id)? {
                return Err(StorageError::recipe_not_found(id));
            }
            match change {
                IngredientChange::Keep => s.update_recipe(id, fields, None),
                IngredientChange::Replace(ids) => {
                    let ingredients = resolve_ingredients(&*s, ids)?;
                    s.update_recipe(id, fields, Some(&ingredients))
                }
            }
        })?;
        tracing::info!(
            id = %id,
            replaced_ingredients = matches!(change, IngredientChange::Replace(_)),
            "updated recipe"
        );
        Ok(recipe)
    }

    pub fn delete_recipe(&mut self, id: RecipeId) -> Result<(), StorageError> {
        self.store.unit_of_work(|s| {
            if !s.recipe_exists(id)? {
                return Err(StorageError::recipe_not_found(id));
            }
            s.delete_recipe(id)
        })?;
        tracing::info!(id = %id, "deleted recipe");
        Ok(())
    }

    /// Lists recipes by identifier, one page at a time.
    pub fn list_recipes(&mut self, page: u32, size: u32) -> Result<Page<Recipe>, StorageError> {
        let request = PageRequest::new(page, size)?;
        let listed = self.store.unit_of_work(|s| s.find_all_recipes(request))?;
        tracing::debug!(page, size, returned = listed.content.len(), "listed recipes");
        Ok(listed)
    }

    /// Runs a filtered search. No match is an empty page, not an error; only
    /// invalid paging fails.
    pub fn search_recipes(
        &mut self,
        criteria: &SearchCriteria,
        page: u32,
        size: u32,
    ) -> Result<Page<RecipeSummary>, StorageError> {
        let request = PageRequest::new(page, size)?;
        let predicate = RecipePredicate::compile(criteria);
        let found = self
            .store
            .unit_of_work(|s| s.search_recipes(&predicate, request))?;
        tracing::info!(
            unfiltered = criteria.is_unfiltered(),
            clauses = predicate.clauses().len(),
            total = found.total_elements,
            returned = found.content.len(),
            "searched recipes"
        );
        Ok(found.map(|recipe| RecipeSummary::from(&recipe)))
    }
}
