//! SQLite implementation of [`Store`].
//!
//! [`SqliteStore`] persists ingredients and recipes in a SQLite database with
//! WAL mode, foreign keys, and automatic schema migrations. Every unit of work
//! runs inside one transaction; returning `Err` from the work closure drops
//! the transaction, which rolls it back.

use std::collections::BTreeSet;
use std::os::raw::c_int;

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use recipe_core::{
    Ingredient, IngredientId, Page, PageRequest, Recipe, RecipeFields, RecipeId, RecipePredicate,
    RecipeType,
};

use crate::error::{EntityKind, StorageError};
use crate::query::render;
use crate::traits::{IngredientStore, RecipeStore, Session, Store};

const RECIPE_COLUMNS: &str =
    "r.id, r.name, r.recipe_type, r.number_of_servings, r.instructions, r.created_at, r.updated_at";

/// SQLite-backed implementation of [`Store`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }
}

impl Store for SqliteStore {
    fn unit_of_work<T, F>(&mut self, work: F) -> Result<T, StorageError>
    where
        F: FnOnce(&mut dyn Session) -> Result<T, StorageError>,
    {
        let mut session = SqliteSession {
            tx: self.conn.transaction()?,
        };
        let out = work(&mut session)?;
        session.tx.commit()?;
        Ok(out)
    }
}

/// One open transaction.
struct SqliteSession<'conn> {
    tx: Transaction<'conn>,
}

// -----------------------------------------------------------------------
// Row mapping
// -----------------------------------------------------------------------

/// Recipe columns as read, before the ingredient set is attached.
struct RecipeRow {
    id: i64,
    name: String,
    recipe_type: String,
    number_of_servings: i64,
    instructions: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecipeRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RecipeRow {
            id: row.get(0)?,
            name: row.get(1)?,
            recipe_type: row.get(2)?,
            number_of_servings: row.get(3)?,
            instructions: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_recipe(self, ingredients: BTreeSet<Ingredient>) -> Result<Recipe, StorageError> {
        let recipe_type: RecipeType =
            self.recipe_type
                .parse()
                .map_err(|_| StorageError::IntegrityError {
                    reason: format!(
                        "recipe {} has unknown type '{}'",
                        self.id, self.recipe_type
                    ),
                })?;
        let number_of_servings = u32::try_from(self.number_of_servings).map_err(|_| {
            StorageError::IntegrityError {
                reason: format!(
                    "recipe {} has out-of-range serving count {}",
                    self.id, self.number_of_servings
                ),
            }
        })?;
        Ok(Recipe {
            id: RecipeId(self.id),
            name: self.name,
            recipe_type,
            number_of_servings,
            instructions: self.instructions,
            ingredients,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn read_ingredient(row: &Row<'_>) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: IngredientId(row.get(0)?),
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn has_extended_code(err: &rusqlite::Error, code: c_int) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == code)
}

/// Translates a failed name write into a constraint violation when SQLite's
/// UNIQUE index rejected it.
fn map_name_conflict(err: rusqlite::Error, entity: EntityKind, name: &str) -> StorageError {
    if has_extended_code(&err, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) {
        StorageError::duplicate_name(entity, name)
    } else {
        StorageError::Sqlite(err)
    }
}

fn limit_offset(page: PageRequest) -> (Value, Value) {
    (
        Value::Integer(i64::from(page.size())),
        Value::Integer(i64::try_from(page.offset()).unwrap_or(i64::MAX)),
    )
}

fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

// -----------------------------------------------------------------------
// Internal helpers
// -----------------------------------------------------------------------

impl SqliteSession<'_> {
    /// Loads the ingredient set attached to a recipe.
    fn load_ingredients(&self, recipe: i64) -> Result<BTreeSet<Ingredient>, StorageError> {
        let mut stmt = self.tx.prepare_cached(
            "SELECT i.id, i.name, i.created_at, i.updated_at
             FROM recipe_ingredients ri
             JOIN ingredients i ON i.id = ri.ingredient_id
             WHERE ri.recipe_id = ?1",
        )?;
        let rows = stmt.query_map(params![recipe], read_ingredient)?;
        let mut result = BTreeSet::new();
        for row in rows {
            result.insert(row?);
        }
        Ok(result)
    }

    /// Attaches ingredient sets to recipe rows, preserving row order.
    fn hydrate(&self, rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, StorageError> {
        rows.into_iter()
            .map(|row| {
                let ingredients = self.load_ingredients(row.id)?;
                row.into_recipe(ingredients)
            })
            .collect()
    }

    /// Replaces the join rows of a recipe. The set is already deduplicated.
    fn write_links(
        &self,
        recipe: i64,
        ingredients: &BTreeSet<Ingredient>,
    ) -> Result<(), StorageError> {
        self.tx.execute(
            "DELETE FROM recipe_ingredients WHERE recipe_id = ?1",
            params![recipe],
        )?;
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO recipe_ingredients (recipe_id, ingredient_id) VALUES (?1, ?2)",
        )?;
        for ingredient in ingredients {
            stmt.execute(params![recipe, ingredient.id.0]).map_err(|e| {
                if has_extended_code(&e, rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                    StorageError::ConstraintViolation {
                        field: "ingredientIds",
                        reason: format!("ingredient {} does not exist", ingredient.id),
                    }
                } else {
                    StorageError::Sqlite(e)
                }
            })?;
        }
        Ok(())
    }

    fn query_recipe_rows(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<RecipeRow>, StorageError> {
        let mut stmt = self.tx.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), RecipeRow::read)?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

impl IngredientStore for SqliteSession<'_> {
    fn save_ingredient(&mut self, name: &str) -> Result<Ingredient, StorageError> {
        let now = Utc::now();
        self.tx
            .execute(
                "INSERT INTO ingredients (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
                params![name, now],
            )
            .map_err(|e| map_name_conflict(e, EntityKind::Ingredient, name))?;
        Ok(Ingredient {
            id: IngredientId(self.tx.last_insert_rowid()),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn find_ingredient(&self, id: IngredientId) -> Result<Option<Ingredient>, StorageError> {
        let ingredient = self
            .tx
            .query_row(
                "SELECT id, name, created_at, updated_at FROM ingredients WHERE id = ?1",
                params![id.0],
                read_ingredient,
            )
            .optional()?;
        Ok(ingredient)
    }

    fn find_all_ingredients(&self, page: PageRequest) -> Result<Page<Ingredient>, StorageError> {
        let total: i64 = self
            .tx
            .query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))?;
        let (limit, offset) = limit_offset(page);
        let mut stmt = self.tx.prepare_cached(
            "SELECT id, name, created_at, updated_at FROM ingredients
             ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![limit, offset], read_ingredient)?;
        let mut content = Vec::new();
        for row in rows {
            content.push(row?);
        }
        Ok(Page {
            content,
            page: page.page(),
            size: page.size(),
            total_elements: count_to_u64(total),
        })
    }

    fn ingredient_exists(&self, id: IngredientId) -> Result<bool, StorageError> {
        let exists: bool = self.tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM ingredients WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_ingredient(&mut self, id: IngredientId) -> Result<(), StorageError> {
        // ON DELETE CASCADE removes the join rows.
        self.tx
            .execute("DELETE FROM ingredients WHERE id = ?1", params![id.0])?;
        Ok(())
    }
}

impl RecipeStore for SqliteSession<'_> {
    fn insert_recipe(
        &mut self,
        fields: &RecipeFields,
        ingredients: &BTreeSet<Ingredient>,
    ) -> Result<Recipe, StorageError> {
        let now = Utc::now();
        self.tx
            .execute(
                "INSERT INTO recipes (name, recipe_type, number_of_servings, instructions, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    fields.name,
                    fields.recipe_type.as_str(),
                    fields.number_of_servings,
                    fields.instructions,
                    now,
                ],
            )
            .map_err(|e| map_name_conflict(e, EntityKind::Recipe, &fields.name))?;
        let id = self.tx.last_insert_rowid();
        self.write_links(id, ingredients)?;

        Ok(Recipe {
            id: RecipeId(id),
            name: fields.name.clone(),
            recipe_type: fields.recipe_type,
            number_of_servings: fields.number_of_servings,
            instructions: fields.instructions.clone(),
            ingredients: ingredients.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    fn update_recipe(
        &mut self,
        id: RecipeId,
        fields: &RecipeFields,
        ingredients: Option<&BTreeSet<Ingredient>>,
    ) -> Result<Recipe, StorageError> {
        let changed = self
            .tx
            .execute(
                "UPDATE recipes
                 SET name = ?1, recipe_type = ?2, number_of_servings = ?3, instructions = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    fields.name,
                    fields.recipe_type.as_str(),
                    fields.number_of_servings,
                    fields.instructions,
                    Utc::now(),
                    id.0,
                ],
            )
            .map_err(|e| map_name_conflict(e, EntityKind::Recipe, &fields.name))?;
        if changed == 0 {
            return Err(StorageError::recipe_not_found(id));
        }
        if let Some(ingredients) = ingredients {
            self.write_links(id.0, ingredients)?;
        }
        self.find_recipe(id)?
            .ok_or_else(|| StorageError::recipe_not_found(id))
    }

    fn find_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, StorageError> {
        let row = self
            .tx
            .query_row(
                &format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?1"),
                params![id.0],
                RecipeRow::read,
            )
            .optional()?;
        match row {
            Some(row) => {
                let ingredients = self.load_ingredients(row.id)?;
                Ok(Some(row.into_recipe(ingredients)?))
            }
            None => Ok(None),
        }
    }

    fn find_all_recipes(&self, page: PageRequest) -> Result<Page<Recipe>, StorageError> {
        let total: i64 = self
            .tx
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        let (limit, offset) = limit_offset(page);
        let rows = self.query_recipe_rows(
            &format!("SELECT {RECIPE_COLUMNS} FROM recipes r ORDER BY r.id LIMIT ?1 OFFSET ?2"),
            &[limit, offset],
        )?;
        Ok(Page {
            content: self.hydrate(rows)?,
            page: page.page(),
            size: page.size(),
            total_elements: count_to_u64(total),
        })
    }

    fn recipe_exists(&self, id: RecipeId) -> Result<bool, StorageError> {
        let exists: bool = self.tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM recipes WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn delete_recipe(&mut self, id: RecipeId) -> Result<(), StorageError> {
        self.tx
            .execute("DELETE FROM recipes WHERE id = ?1", params![id.0])?;
        Ok(())
    }

    fn search_recipes(
        &self,
        predicate: &RecipePredicate,
        page: PageRequest,
    ) -> Result<Page<Recipe>, StorageError> {
        let rendered = render(predicate);
        let distinct = if rendered.distinct { "DISTINCT " } else { "" };

        let total: i64 = self.tx.query_row(
            &format!("SELECT COUNT({distinct}r.id) {}", rendered.from_where),
            params_from_iter(rendered.params.iter()),
            |row| row.get(0),
        )?;

        let limit_param = rendered.next_param();
        let sql = format!(
            "SELECT {distinct}{RECIPE_COLUMNS} {} ORDER BY r.name ASC LIMIT ?{} OFFSET ?{}",
            rendered.from_where,
            limit_param,
            limit_param + 1,
        );
        tracing::debug!(sql = %sql, params = rendered.params.len(), "searching recipes");

        let (limit, offset) = limit_offset(page);
        let mut params = rendered.params;
        params.push(limit);
        params.push(offset);
        let rows = self.query_recipe_rows(&sql, &params)?;

        Ok(Page {
            content: self.hydrate(rows)?,
            page: page.page(),
            size: page.size(),
            total_elements: count_to_u64(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_core::SearchCriteria;

    fn fields(name: &str, ty: RecipeType, servings: u32) -> RecipeFields {
        RecipeFields {
            name: name.to_string(),
            recipe_type: ty,
            number_of_servings: servings,
            instructions: "Mix well".to_string(),
        }
    }

    fn page() -> PageRequest {
        PageRequest::new(0, 20).unwrap()
    }

    #[test]
    fn duplicate_ingredient_name_is_a_constraint_violation() {
        let mut store = SqliteStore::in_memory().unwrap();
        store.unit_of_work(|s| s.save_ingredient("salt")).unwrap();
        let err = store
            .unit_of_work(|s| s.save_ingredient("salt"))
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::ConstraintViolation { field: "name", .. }
        ));
    }

    #[test]
    fn rollback_discards_partial_writes() {
        let mut store = SqliteStore::in_memory().unwrap();
        let err = store
            .unit_of_work(|s| {
                s.save_ingredient("salt")?;
                s.insert_recipe(&fields("Soup", RecipeType::Other, 1), &BTreeSet::new())?;
                Err::<(), _>(StorageError::ingredient_not_found(IngredientId(42)))
            })
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));

        let (ingredients, recipes) = store
            .unit_of_work(|s| Ok((s.find_all_ingredients(page())?, s.find_all_recipes(page())?)))
            .unwrap();
        assert_eq!(ingredients.total_elements, 0);
        assert_eq!(recipes.total_elements, 0);
    }

    #[test]
    fn recipe_round_trips_with_ingredients() {
        let mut store = SqliteStore::in_memory().unwrap();
        let (created, loaded) = store
            .unit_of_work(|s| {
                let salt = s.save_ingredient("salt")?;
                let created = s.insert_recipe(
                    &fields("Soup", RecipeType::Vegetarian, 3),
                    &[salt].into(),
                )?;
                let loaded = s.find_recipe(created.id)?;
                Ok((created, loaded))
            })
            .unwrap();
        let loaded = loaded.unwrap();
        assert_eq!(loaded.name, "Soup");
        assert_eq!(loaded.recipe_type, RecipeType::Vegetarian);
        assert_eq!(loaded.number_of_servings, 3);
        assert_eq!(loaded.ingredient_ids(), created.ingredient_ids());
    }

    #[test]
    fn deleting_an_ingredient_cascades_to_links_only() {
        let mut store = SqliteStore::in_memory().unwrap();
        let recipe = store
            .unit_of_work(|s| {
                let salt = s.save_ingredient("salt")?;
                let recipe = s.insert_recipe(
                    &fields("Soup", RecipeType::Vegetarian, 3),
                    &[salt.clone()].into(),
                )?;
                s.delete_ingredient(salt.id)?;
                s.find_recipe(recipe.id)
            })
            .unwrap()
            .expect("recipe survives ingredient deletion");
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn linking_a_missing_ingredient_is_rejected() {
        let mut store = SqliteStore::in_memory().unwrap();
        let now = Utc::now();
        let ghost = Ingredient {
            id: IngredientId(77),
            name: "ghost".into(),
            created_at: now,
            updated_at: now,
        };
        let err = store
            .unit_of_work(|s| {
                s.insert_recipe(&fields("Soup", RecipeType::Other, 1), &[ghost].into())
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::ConstraintViolation { field: "ingredientIds", .. }
        ));
    }

    #[test]
    fn join_search_returns_each_recipe_once() {
        let mut store = SqliteStore::in_memory().unwrap();
        let found = store
            .unit_of_work(|s| {
                let salt = s.save_ingredient("salt")?;
                let pepper = s.save_ingredient("pepper")?;
                let sea_salt = s.save_ingredient("Sea salt")?;
                s.insert_recipe(
                    &fields("Soup", RecipeType::Vegetarian, 2),
                    &[salt, pepper, sea_salt].into(),
                )?;
                let criteria = SearchCriteria {
                    include_ingredient: Some("SALT".into()),
                    ..SearchCriteria::default()
                };
                s.search_recipes(&RecipePredicate::compile(&criteria), page())
            })
            .unwrap();
        assert_eq!(found.total_elements, 1);
        assert_eq!(found.content.len(), 1);
        assert_eq!(found.content[0].ingredients.len(), 3);
    }

    #[test]
    fn instruction_wildcards_are_literal() {
        let mut store = SqliteStore::in_memory().unwrap();
        let found = store
            .unit_of_work(|s| {
                s.insert_recipe(&fields("Soup", RecipeType::Other, 2), &BTreeSet::new())?;
                let criteria = SearchCriteria {
                    instruction: Some("%".into()),
                    ..SearchCriteria::default()
                };
                s.search_recipes(&RecipePredicate::compile(&criteria), page())
            })
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn on_disk_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.db");
        let path = path.to_str().unwrap();

        let id = {
            let mut store = SqliteStore::new(path).unwrap();
            store.unit_of_work(|s| s.save_ingredient("salt")).unwrap().id
        };

        let mut store = SqliteStore::new(path).unwrap();
        let found = store.unit_of_work(|s| s.find_ingredient(id)).unwrap();
        assert_eq!(found.map(|i| i.name), Some("salt".to_string()));
    }
}
