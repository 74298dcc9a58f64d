//! Account routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use wellness_tracker_shared::{UpdateUserRequest, UserProfile};

pub fn users_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me).delete(delete_me))
}

/// GET /api/v1/users/me
async fn get_me(auth: AuthUser) -> Json<UserProfile> {
    Json(UserService::profile(auth.account))
}

/// PUT /api/v1/users/me
async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::update_profile(state.db(), auth.user_id, req).await?;
    Ok(Json(profile))
}

/// DELETE /api/v1/users/me
///
/// Owned goals, logs, tasks, achievements and preferences go with the
/// account.
async fn delete_me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    UserService::delete_account(state.db(), auth.user_id).await?;
    Ok(Json(serde_json::json!({"deleted": true})))
}
