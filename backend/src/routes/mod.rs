//! Route definitions for the Wellness Tracker API
//!
//! Every resource router is nested under `/api/v1`; health probes and the
//! Prometheus endpoint sit at the root.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod achievements;
mod auth;
mod daily_tasks;
mod food_logs;
mod goals;
mod health;
mod meals;
mod nutrition;
mod preferences;
mod statistics;
mod tasks;
mod users;


/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(render_metrics))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Wellness Tracker API v1" }))
        .nest("/auth", auth::auth_routes())
        .nest("/users", users::users_routes())
        .nest("/goals", goals::goals_routes())
        .nest("/food-logs", food_logs::food_logs_routes())
        .nest("/meals", meals::meals_routes())
        .nest("/daily-tasks", daily_tasks::daily_tasks_routes())
        .nest("/tasks", tasks::tasks_routes())
        .nest("/achievements", achievements::achievements_routes())
        .nest("/nutrition", nutrition::nutrition_routes())
        .nest("/preferences", preferences::preferences_routes())
        .nest("/statistics", statistics::statistics_routes())
}

/// GET /metrics - Prometheus text exposition
async fn render_metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or_else(|| ApiError::NotFound("Metrics recorder not installed".to_string()))
}
