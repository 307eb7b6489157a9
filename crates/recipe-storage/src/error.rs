//! Storage error types for recipe-storage.
//!
//! [`StorageError`] carries the three domain failure kinds callers branch on
//! (not found, constraint violation, invalid argument) plus the backend
//! failures that only ever surface as internal errors.

use std::fmt;

use recipe_core::CoreError;
use thiserror::Error;

/// Kind of entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ingredient,
    Recipe,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Ingredient => f.write_str("ingredient"),
            EntityKind::Recipe => f.write_str("recipe"),
        }
    }
}

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An operation addressed an identifier that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: i64 },

    /// A uniqueness or structural constraint rejected the write.
    #[error("constraint violation on '{field}': {reason}")]
    ConstraintViolation { field: &'static str, reason: String },

    /// The input was rejected before reaching the store.
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// Stored data could not be mapped back into the domain model.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}

impl StorageError {
    pub fn ingredient_not_found(id: recipe_core::IngredientId) -> Self {
        StorageError::NotFound {
            entity: EntityKind::Ingredient,
            id: id.0,
        }
    }

    pub fn recipe_not_found(id: recipe_core::RecipeId) -> Self {
        StorageError::NotFound {
            entity: EntityKind::Recipe,
            id: id.0,
        }
    }

    pub(crate) fn duplicate_name(entity: EntityKind, name: &str) -> Self {
        StorageError::ConstraintViolation {
            field: "name",
            reason: format!("{entity} named '{name}' already exists"),
        }
    }
}

impl From<CoreError> for StorageError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidArgument { field, reason } => {
                StorageError::InvalidArgument { field, reason }
            }
        }
    }
}
