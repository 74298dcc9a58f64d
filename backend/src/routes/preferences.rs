//! Preferences routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PreferencesService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use wellness_tracker_shared::{
    CreatePreferencesRequest, PreferencesResponse, UpdatePreferencesRequest,
};

pub fn preferences_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        post(create_preferences)
            .get(get_preferences)
            .put(update_preferences),
    )
}

/// POST /api/v1/preferences
async fn create_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreatePreferencesRequest>,
) -> ApiResult<(StatusCode, Json<PreferencesResponse>)> {
    let prefs = PreferencesService::create(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(prefs)))
}

/// GET /api/v1/preferences
async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<PreferencesResponse>> {
    let prefs = PreferencesService::get(state.db(), auth.user_id).await?;
    Ok(Json(prefs))
}

/// PUT /api/v1/preferences
async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<PreferencesResponse>> {
    let prefs = PreferencesService::update(state.db(), auth.user_id, req).await?;
    Ok(Json(prefs))
}
