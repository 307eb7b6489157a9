//! In-memory implementation of [`Store`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral use. It
//! keeps all data in BTreeMaps with the same semantics as the SQLite backend:
//! unique names, never-reused identifiers, detach-on-delete for ingredients,
//! and all-or-nothing units of work (run against a copy of the state that
//! replaces the live state only on success).

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;

use recipe_core::{
    Ingredient, IngredientId, Page, PageRequest, Recipe, RecipeFields, RecipeId, RecipePredicate,
};

use crate::error::{EntityKind, StorageError};
use crate::traits::{IngredientStore, RecipeStore, Session, Store};

/// A recipe row plus its join rows.
#[derive(Debug, Clone)]
struct StoredRecipe {
    fields: RecipeFields,
    ingredient_ids: BTreeSet<IngredientId>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

/// Everything the backend holds.
#[derive(Debug, Clone, Default)]
struct MemoryState {
    ingredients: BTreeMap<IngredientId, Ingredient>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    /// Last allocated ids; never decremented, so deleted ids stay retired.
    last_ingredient_id: i64,
    last_recipe_id: i64,
}

impl MemoryState {
    fn materialize(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        Recipe {
            id,
            name: stored.fields.name.clone(),
            recipe_type: stored.fields.recipe_type,
            number_of_servings: stored.fields.number_of_servings,
            instructions: stored.fields.instructions.clone(),
            ingredients: stored
                .ingredient_ids
                .iter()
                .filter_map(|iid| self.ingredients.get(iid).cloned())
                .collect(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn recipe_name_taken(&self, name: &str, except: Option<RecipeId>) -> bool {
        self.recipes
            .iter()
            .any(|(id, r)| Some(*id) != except && r.fields.name == name)
    }

    /// Rejects join rows that would point at a missing ingredient, as the
    /// SQLite foreign key does.
    fn check_ingredients(&self, ingredients: &BTreeSet<Ingredient>) -> Result<(), StorageError> {
        match ingredients
            .iter()
            .find(|i| !self.ingredients.contains_key(&i.id))
        {
            Some(missing) => Err(StorageError::ConstraintViolation {
                field: "ingredientIds",
                reason: format!("ingredient {} does not exist", missing.id),
            }),
            None => Ok(()),
        }
    }
}

/// A unit of work's view of the state.
struct MemorySession<'a> {
    state: &'a mut MemoryState,
}

impl IngredientStore for MemorySession<'_> {
    fn save_ingredient(&mut self, name: &str) -> Result<Ingredient, StorageError> {
        if self.state.ingredients.values().any(|i| i.name == name) {
            return Err(StorageError::duplicate_name(EntityKind::Ingredient, name));
        }
        self.state.last_ingredient_id += 1;
        let now = Utc::now();
        let ingredient = Ingredient {
            id: IngredientId(self.state.last_ingredient_id),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.state
            .ingredients
            .insert(ingredient.id, ingredient.clone());
        Ok(ingredient)
    }

    fn find_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, StorageError> {
        Ok(self.state.ingredients.get(&id).cloned())
    }

    fn find_all_ingredients(&self, page: PageRequest) -> Result<Page<Ingredient>, StorageError> {
        Ok(page.slice(self.state.ingredients.values().cloned().collect()))
    }

    fn ingredient_exists(&self, id: IngredientId) -> Result<bool, StorageError> {
        Ok(self.state.ingredients.contains_key(&id))
    }

    fn delete_ingredient(&mut self, id: IngredientId) -> Result<(), StorageError> {
        if self.state.ingredients.remove(&id).is_some() {
            for recipe in self.state.recipes.values_mut() {
                recipe.ingredient_ids.remove(&id);
            }
        }
        Ok(())
    }
}

impl RecipeStore for MemorySession<'_> {
    fn insert_recipe(
        &mut self,
        fields: &RecipeFields,
        ingredients: &BTreeSet<Ingredient>,
    ) -> Result<Recipe, StorageError> {
        if self.state.recipe_name_taken(&fields.name, None) {
            return Err(StorageError::duplicate_name(EntityKind::Recipe, &fields.name));
        }
        self.state.check_ingredients(ingredients)?;

        self.state.last_recipe_id += 1;
        let id = RecipeId(self.state.last_recipe_id);
        let now = Utc::now();
        let stored = StoredRecipe {
            fields: fields.clone(),
            ingredient_ids: ingredients.iter().map(|i| i.id).collect(),
            created_at: now,
            updated_at: now,
        };
        let recipe = self.state.materialize(id, &stored);
        self.state.recipes.insert(id, stored);
        Ok(recipe)
    }

    fn update_recipe(
        &mut self,
        id: RecipeId,
        fields: &RecipeFields,
        ingredients: Option<&BTreeSet<Ingredient>>,
    ) -> Result<Recipe, StorageError> {
        if !self.state.recipes.contains_key(&id) {
            return Err(StorageError::recipe_not_found(id));
        }
        if self.state.recipe_name_taken(&fields.name, Some(id)) {
            return Err(StorageError::duplicate_name(EntityKind::Recipe, &fields.name));
        }
        if let Some(ingredients) = ingredients {
            self.state.check_ingredients(ingredients)?;
        }

        let stored = self
            .state
            .recipes
            .get_mut(&id)
            .ok_or_else(|| StorageError::recipe_not_found(id))?;
        stored.fields = fields.clone();
        stored.updated_at = Utc::now();
        if let Some(ingredients) = ingredients {
            stored.ingredient_ids = ingredients.iter().map(|i| i.id).collect();
        }

        let stored = stored.clone();
        Ok(self.state.materialize(id, &stored))
    }

    fn find_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, StorageError> {
        Ok(self
            .state
            .recipes
            .get(&id)
            .map(|stored| self.state.materialize(id, stored)))
    }

    fn find_all_recipes(&self, page: PageRequest) -> Result<Page<Recipe>, StorageError> {
        let all = self
            .state
            .recipes
            .iter()
            .map(|(id, stored)| self.state.materialize(*id, stored))
            .collect();
        Ok(page.slice(all))
    }

    fn recipe_exists(&self, id: RecipeId) -> Result<bool, StorageError> {
        Ok(self.state.recipes.contains_key(&id))
    }

    fn delete_recipe(&mut self, id: RecipeId) -> Result<(), StorageError> {
        self.state.recipes.remove(&id);
        Ok(())
    }

    fn search_recipes(
        &self,
        predicate: &RecipePredicate,
        page: PageRequest,
    ) -> Result<Page<Recipe>, StorageError> {
        // One pass over recipe rows, so each recipe is visited once no matter
        // how many of its ingredients match.
        let mut matches: Vec<Recipe> = self
            .state
            .recipes
            .iter()
            .map(|(id, stored)| self.state.materialize(*id, stored))
            .filter(|recipe| predicate.matches(recipe))
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page.slice(matches))
    }
}

/// In-memory implementation of [`Store`].
///
/// Every unit of work, reads included, runs against a full clone of the
/// state, so each operation costs O(store size). Meant for tests and
/// ephemeral use; use [`SqliteStore`](crate::SqliteStore) for real data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: MemoryState,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn unit_of_work<T, F>(&mut self, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn Session) -> Result<T, StorageError>,
    {
        let mut working = self.state.clone();
        let mut session = MemorySession {
            state: &mut working,
        };
        let out = work(&mut session)?;
        self.state = working;
        Ok(out)
    }
}
