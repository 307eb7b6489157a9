//! HTTP/JSON API server for the recipe catalogue.
//!
//! Provides [`RecipeService`](service::RecipeService), the orchestration layer
//! shared with the CLI, plus the axum router, API schema types, error mapping
//! and configuration of the `recipe-server` binary.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
