//! Application state with a shared `RecipeService` for concurrent access.
//!
//! [`AppState`] wraps the service in `Arc<tokio::sync::Mutex<>>` for use with
//! axum handlers. Uses `tokio::sync::Mutex` (async-aware) instead of
//! `std::sync::Mutex` (blocking) so handlers await the lock without blocking
//! the tokio runtime.
//!
//! `SqliteStore` owns a `rusqlite::Connection`, which is `!Sync`, so an
//! `RwLock` is not an option. Requests are serialized on the lock; each one
//! still runs as a single SQLite transaction.

use std::sync::Arc;

use recipe_storage::SqliteStore;

use crate::error::ApiError;
use crate::service::RecipeService;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared recipe service (async Mutex -- non-blocking await).
    pub service: Arc<tokio::sync::Mutex<RecipeService<SqliteStore>>>,
}

impl AppState {
    /// Creates a new `AppState` backed by the SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let service = RecipeService::open(db_path)?;
        Ok(Self::from_service(service))
    }

    /// Creates a new `AppState` with an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let service = RecipeService::in_memory()?;
        Ok(Self::from_service(service))
    }

    fn from_service(service: RecipeService<SqliteStore>) -> Self {
        AppState {
            service: Arc::new(tokio::sync::Mutex::new(service)),
        }
    }
}
