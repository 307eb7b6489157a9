//! Recipe handlers (create, update, delete, list, get, search).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use recipe_core::{Page, Recipe, RecipeId, RecipeSummary};

use crate::error::ApiError;
use crate::schema::common::{CreatedResponse, IdQuery, PagePath};
use crate::schema::recipes::{CreateRecipeRequest, SearchParams, UpdateRecipeRequest};
use crate::state::AppState;

/// Creates a recipe, attaching the listed ingredients.
///
/// `POST /api/v1/recipe`
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    tracing::info!("creating recipe");
    let (fields, ingredient_ids) = req.body.into_fields()?;
    let mut service = state.service.lock().await;
    let id = service.create_recipe(&fields, ingredient_ids.as_deref())?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.0 })))
}

/// Overwrites a recipe. `ingredientIds` absent or `null` keeps the current set.
///
/// `PATCH /api/v1/recipe`
pub async fn update_recipe(
    State(state): State<AppState>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let id = RecipeId(req.id);
    tracing::info!(id = %id, "updating recipe");
    let (fields, change) = req.into_parts()?;
    let mut service = state.service.lock().await;
    Ok(Json(service.update_recipe(id, &fields, &change)?))
}

/// `DELETE /api/v1/recipe?id=..`
pub async fn delete_recipe(
    State(state): State<AppState>,
    Query(IdQuery { id }): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::info!(id, "deleting recipe");
    let mut service = state.service.lock().await;
    service.delete_recipe(RecipeId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Lists one page of recipes.
///
/// `GET /api/v1/recipe/page/{page}/size/{size}`
pub async fn list_recipes(
    State(state): State<AppState>,
    Path(PagePath { page, size }): Path<PagePath>,
) -> Result<Json<Page<Recipe>>, ApiError> {
    tracing::info!(page, size, "listing recipes");
    let mut service = state.service.lock().await;
    Ok(Json(service.list_recipes(page, size)?))
}

/// `GET /api/v1/recipe/{id}`
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Recipe>, ApiError> {
    tracing::info!(id, "getting recipe");
    let mut service = state.service.lock().await;
    Ok(Json(service.get_recipe(RecipeId(id))?))
}

/// Searches recipes; no match is an empty page.
///
/// `GET /api/v1/recipe/search?page=0&size=10&vegetarian=..&servings=..&includeIngredient=..&instruction=..`
pub async fn search_recipes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<RecipeSummary>>, ApiError> {
    tracing::info!(page = params.page, size = params.size, "searching recipes");
    let mut service = state.service.lock().await;
    let found = service.search_recipes(&params.criteria(), params.page, params.size)?;
    Ok(Json(found))
}
