//! Daily task routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::TaskService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use wellness_tracker_shared::{CreateDailyTaskRequest, DailyTaskResponse, TaskResponse};

pub fn daily_tasks_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(open_daily_task))
        .route("/date/:date", get(daily_task_by_date))
        .route("/:id/tasks", get(daily_task_tasks))
}

/// POST /api/v1/daily-tasks
///
/// Idempotent per date.
async fn open_daily_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateDailyTaskRequest>,
) -> ApiResult<Json<DailyTaskResponse>> {
    let daily = TaskService::open_daily_task(state.db(), auth.user_id, req.date).await?;
    Ok(Json(daily))
}

/// GET /api/v1/daily-tasks/date/:date
async fn daily_task_by_date(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<DailyTaskResponse>> {
    let daily = TaskService::daily_task_by_date(state.db(), auth.user_id, date).await?;
    Ok(Json(daily))
}

/// GET /api/v1/daily-tasks/:id/tasks
async fn daily_task_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = TaskService::tasks_for_daily_task(state.db(), auth.user_id, &id).await?;
    Ok(Json(tasks))
}
