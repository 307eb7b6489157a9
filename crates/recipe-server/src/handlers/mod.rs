//! HTTP handler modules for the recipe API.
//!
//! Each sub-module implements thin handlers that parse requests, acquire the
//! service lock, delegate to [`RecipeService`](crate::service::RecipeService),
//! and return JSON responses. No business logic lives in handlers.

pub mod ingredients;
pub mod recipes;
