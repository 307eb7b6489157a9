//! Router assembly for the recipe HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes under `/api/v1`.
///
/// `/recipe/search` is registered beside `/recipe/{id}`; axum prefers the
/// static segment, so `search` is never parsed as an id.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        // Ingredients
        .route(
            "/ingredient",
            post(handlers::ingredients::create_ingredient)
                .delete(handlers::ingredients::delete_ingredient),
        )
        .route(
            "/ingredient/page/{page}/size/{size}",
            get(handlers::ingredients::list_ingredients),
        )
        .route("/ingredient/{id}", get(handlers::ingredients::get_ingredient))
        // Recipes
        .route(
            "/recipe",
            post(handlers::recipes::create_recipe)
                .patch(handlers::recipes::update_recipe)
                .delete(handlers::recipes::delete_recipe),
        )
        .route(
            "/recipe/page/{page}/size/{size}",
            get(handlers::recipes::list_recipes),
        )
        .route("/recipe/search", get(handlers::recipes::search_recipes))
        .route("/recipe/{id}", get(handlers::recipes::get_recipe));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
