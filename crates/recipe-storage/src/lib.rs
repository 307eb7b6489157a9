//! Storage for the recipe catalogue.
//!
//! Provides the [`Store`] contract that all backends implement, plus the
//! [`InMemoryStore`] and [`SqliteStore`] as first-class backends.
//!
//! # Architecture
//!
//! - [`IngredientStore`] / [`RecipeStore`] are the per-entity operations.
//! - [`Store::unit_of_work`] runs a closure against a [`Session`] (both entity
//!   stores) and commits only if the closure succeeds.
//! - [`resolve_ingredients`] turns identifier lists into entity sets,
//!   all-or-nothing.
//!
//! # Modules
//!
//! - [`error`]: StorageError, EntityKind
//! - [`traits`]: IngredientStore, RecipeStore, Session, Store
//! - [`resolver`]: ingredient id resolution
//! - [`query`]: predicate rendering to SQL
//! - [`memory`]: InMemoryStore implementation
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod memory;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use error::{EntityKind, StorageError};
pub use memory::InMemoryStore;
pub use resolver::resolve_ingredients;
pub use sqlite::SqliteStore;
pub use traits::{IngredientStore, RecipeStore, Session, Store};
