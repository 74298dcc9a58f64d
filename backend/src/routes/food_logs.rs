//! Food log routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::FoodService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use wellness_tracker_shared::{CreateFoodLogRequest, FoodLogResponse, ListQuery, MealResponse};

pub fn food_logs_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(open_food_log).get(list_food_logs))
        .route("/date/:date", get(food_log_by_date))
        .route("/:id/meals", get(food_log_meals))
}

/// POST /api/v1/food-logs
///
/// Idempotent per date: a second call returns the existing log.
async fn open_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFoodLogRequest>,
) -> ApiResult<Json<FoodLogResponse>> {
    let log = FoodService::open_log(state.db(), auth.user_id, req.date).await?;
    Ok(Json(log))
}

/// GET /api/v1/food-logs
async fn list_food_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<FoodLogResponse>>> {
    let logs = FoodService::list_logs(state.db(), auth.user_id, &query).await?;
    Ok(Json(logs))
}

/// GET /api/v1/food-logs/date/:date
async fn food_log_by_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<FoodLogResponse>> {
    let log = FoodService::log_by_date(state.db(), auth.user_id, date).await?;
    Ok(Json(log))
}

/// GET /api/v1/food-logs/:id/meals
async fn food_log_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<MealResponse>>> {
    let meals = FoodService::meals_for_log(state.db(), auth.user_id, &id).await?;
    Ok(Json(meals))
}
