//! App statistics routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::StatisticsService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use wellness_tracker_shared::{StatisticsResponse, UpdateStatisticsRequest};

pub fn statistics_routes() -> Router<AppState> {
    Router::new().route("/", get(get_statistics).put(update_statistics))
}

/// GET /api/v1/statistics
async fn get_statistics(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<StatisticsResponse>> {
    let stats = StatisticsService::get(state.db()).await?;
    Ok(Json(stats))
}

/// PUT /api/v1/statistics
async fn update_statistics(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<UpdateStatisticsRequest>,
) -> ApiResult<Json<StatisticsResponse>> {
    let stats = StatisticsService::update(state.db(), req).await?;
    Ok(Json(stats))
}
