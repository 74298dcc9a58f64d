//! Achievement routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::AchievementService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use serde::Deserialize;
use wellness_tracker_shared::{
    AchievementProgressRequest, AchievementResponse, CreateAchievementRequest,
    UpdateAchievementRequest,
};

pub fn achievements_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_achievement).get(list_achievements))
        .route("/:id", put(update_achievement).delete(delete_achievement))
        .route("/:id/progress", post(add_progress))
}

#[derive(Debug, Default, Deserialize)]
struct AchievementsQuery {
    #[serde(rename = "type")]
    achievement_type: Option<String>,
}

/// POST /api/v1/achievements
async fn create_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAchievementRequest>,
) -> ApiResult<(StatusCode, Json<AchievementResponse>)> {
    let achievement = AchievementService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(achievement)))
}

/// GET /api/v1/achievements?type=streak
async fn list_achievements(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AchievementsQuery>,
) -> ApiResult<Json<Vec<AchievementResponse>>> {
    let achievements =
        AchievementService::list(state.db(), auth.user_id, query.achievement_type.as_deref())
            .await?;
    Ok(Json(achievements))
}

/// PUT /api/v1/achievements/:id
async fn update_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateAchievementRequest>,
) -> ApiResult<Json<AchievementResponse>> {
    let achievement = AchievementService::update(state.db(), auth.user_id, &id, req).await?;
    Ok(Json(achievement))
}

/// POST /api/v1/achievements/:id/progress
///
/// An empty body counts as one step.
async fn add_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    req: Option<Json<AchievementProgressRequest>>,
) -> ApiResult<Json<AchievementResponse>> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let achievement = AchievementService::add_progress(state.db(), auth.user_id, &id, req).await?;
    Ok(Json(achievement))
}

/// DELETE /api/v1/achievements/:id
async fn delete_achievement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    AchievementService::delete(state.db(), auth.user_id, &id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
