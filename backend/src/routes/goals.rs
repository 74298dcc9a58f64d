//! Goals API routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::GoalsService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use wellness_tracker_shared::{CreateGoalRequest, GoalResponse, GoalsListQuery, UpdateGoalRequest};

/// Create goals routes
pub fn goals_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_goal).get(list_goals))
        .route("/:id", get(get_goal).put(update_goal).delete(delete_goal))
}

/// POST /api/v1/goals - Create a new goal
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> ApiResult<(StatusCode, Json<GoalResponse>)> {
    let goal = GoalsService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/v1/goals - List goals, active ones only unless `active_only=false`
async fn list_goals(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<GoalsListQuery>,
) -> ApiResult<Json<Vec<GoalResponse>>> {
    let active_only = query.active_only.unwrap_or(true);
    let goals = GoalsService::list(state.db(), auth.user_id, active_only).await?;
    Ok(Json(goals))
}

/// GET /api/v1/goals/:id
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<GoalResponse>> {
    let goal = GoalsService::get(state.db(), auth.user_id, &id).await?;
    Ok(Json(goal))
}

/// PUT /api/v1/goals/:id
async fn update_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateGoalRequest>,
) -> ApiResult<Json<GoalResponse>> {
    let goal = GoalsService::update(state.db(), auth.user_id, &id, req).await?;
    Ok(Json(goal))
}

/// DELETE /api/v1/goals/:id
async fn delete_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    GoalsService::delete(state.db(), auth.user_id, &id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
