//! Meal routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::FoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use wellness_tracker_shared::{CreateMealRequest, ListQuery, MealResponse, UpdateMealRequest};

pub fn meals_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_meal).get(list_meals))
        .route("/:id", put(update_meal).delete(delete_meal))
}

/// POST /api/v1/meals
async fn create_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMealRequest>,
) -> ApiResult<(StatusCode, Json<MealResponse>)> {
    let meal = FoodService::create_meal(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// GET /api/v1/meals
async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<MealResponse>>> {
    let meals = FoodService::list_meals(state.db(), auth.user_id, &query).await?;
    Ok(Json(meals))
}

/// PUT /api/v1/meals/:id
async fn update_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateMealRequest>,
) -> ApiResult<Json<MealResponse>> {
    let meal = FoodService::update_meal(state.db(), auth.user_id, &id, req).await?;
    Ok(Json(meal))
}

/// DELETE /api/v1/meals/:id
async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    FoodService::delete_meal(state.db(), auth.user_id, &id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
