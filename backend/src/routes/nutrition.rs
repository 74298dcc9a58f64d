//! Nutrition lookup routes
//!
//! The nutrition table is shared across accounts; writes still require a
//! signed-in caller.

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::NutritionService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use wellness_tracker_shared::{
    CreateNutritionItemRequest, NutritionItemResponse, NutritionSearchQuery,
    UpdateNutritionItemRequest,
};

pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_item))
        .route("/search", get(search_items))
        .route("/:id", get(get_item).put(update_item))
}

/// POST /api/v1/nutrition
async fn create_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<CreateNutritionItemRequest>,
) -> ApiResult<(StatusCode, Json<NutritionItemResponse>)> {
    let item = NutritionService::create(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/nutrition/search?food_name=
async fn search_items(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<NutritionSearchQuery>,
) -> ApiResult<Json<Vec<NutritionItemResponse>>> {
    let items = NutritionService::search(state.db(), &query.food_name).await?;
    Ok(Json(items))
}

/// GET /api/v1/nutrition/:id
async fn get_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<NutritionItemResponse>> {
    let item = NutritionService::get(state.db(), &id).await?;
    Ok(Json(item))
}

/// PUT /api/v1/nutrition/:id
async fn update_item(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateNutritionItemRequest>,
) -> ApiResult<Json<NutritionItemResponse>> {
    let item = NutritionService::update(state.db(), &id, req).await?;
    Ok(Json(item))
}
