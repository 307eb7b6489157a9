//! Ingredient handlers (create, list, get, delete).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use recipe_core::{Ingredient, IngredientId, Page};

use crate::error::ApiError;
use crate::schema::common::{CreatedResponse, IdQuery, PagePath};
use crate::schema::ingredients::CreateIngredientRequest;
use crate::state::AppState;

/// Creates an ingredient.
///
/// `POST /api/v1/ingredient`
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(req): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    tracing::info!("creating ingredient");
    let mut service = state.service.lock().await;
    let id = service.create_ingredient(&req.name)?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.0 })))
}

/// Lists one page of ingredients.
///
/// `GET /api/v1/ingredient/page/{page}/size/{size}`
pub async fn list_ingredients(
    State(state): State<AppState>,
    Path(PagePath { page, size }): Path<PagePath>,
) -> Result<Json<Page<Ingredient>>, ApiError> {
    tracing::info!(page, size, "listing ingredients");
    let mut service = state.service.lock().await;
    Ok(Json(service.list_ingredients(page, size)?))
}

/// `GET /api/v1/ingredient/{id}`
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ingredient>, ApiError> {
    tracing::info!(id, "getting ingredient");
    let mut service = state.service.lock().await;
    Ok(Json(service.get_ingredient(IngredientId(id))?))
}

/// Deletes an ingredient and detaches it from every recipe.
///
/// `DELETE /api/v1/ingredient?id=..`
pub async fn delete_ingredient(
    State(state): State<AppState>,
    Query(IdQuery { id }): Query<IdQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    tracing::info!(id, "deleting ingredient");
    let mut service = state.service.lock().await;
    service.delete_ingredient(IngredientId(id))?;
    Ok(Json(serde_json::json!({ "success": true })))
}
