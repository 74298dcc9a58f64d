//! Authentication routes
//!
//! Registration, login (JSON and OAuth2 password form), token refresh and
//! the current-account lookup. Password hashing happens on the blocking
//! pool inside [`AuthService`](crate::services::AuthService).

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use secrecy::SecretString;
use validator::Validate;
use wellness_tracker_shared::{
    AuthTokens, LoginRequest, RefreshTokenRequest, RegisterRequest, RegisteredAccount,
    TokenFormRequest, UserProfile,
};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token", post(token))
        .route("/refresh", post(refresh_token))
        .route("/me", get(me))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisteredAccount>)> {
    req.validate()?;

    let account = state
        .auth()
        .register(&req.email, SecretString::new(req.password), req.username)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = state
        .auth()
        .login(&req.email, SecretString::new(req.password))
        .await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/token
///
/// OAuth2 password grant; `username` carries the email.
async fn token(
    State(state): State<AppState>,
    Form(req): Form<TokenFormRequest>,
) -> ApiResult<Json<AuthTokens>> {
    if req.grant_type.as_deref().is_some_and(|g| g != "password") {
        return Err(ApiError::BadRequest("Unsupported grant type".to_string()));
    }

    let tokens = state
        .auth()
        .login(&req.username, SecretString::new(req.password))
        .await?;
    Ok(Json(tokens))
}

/// POST /api/v1/auth/refresh
async fn refresh_token(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AuthTokens>> {
    let tokens = state.auth().refresh(&req.refresh_token).await?;
    Ok(Json(tokens))
}

/// GET /api/v1/auth/me
async fn me(auth: AuthUser) -> Json<UserProfile> {
    Json(UserService::profile(auth.account))
}
