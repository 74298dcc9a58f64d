//! Task routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::TaskService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use wellness_tracker_shared::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};

pub fn tasks_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task))
        .route("/:id", put(update_task).delete(delete_task))
}

/// POST /api/v1/tasks
async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let task = TaskService::create_task(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/v1/tasks/:id
async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task = TaskService::update_task(state.db(), auth.user_id, &id, req).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/:id
async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    TaskService::delete_task(state.db(), auth.user_id, &id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
