//! Health check endpoints
//!
//! - /health - process is up
//! - /health/ready - database reachable
//! - /health/live - always OK while serving

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<CheckStatus>,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn response(status: &'static str, database: Option<CheckStatus>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    response("healthy", None)
}

/// Readiness probe; 503 when the database cannot be reached
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(state.db()).await {
        Ok(()) => Ok(response(
            "ready",
            Some(CheckStatus {
                healthy: true,
                message: None,
            }),
        )),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                response(
                    "not_ready",
                    Some(CheckStatus {
                        healthy: false,
                        message: Some("database unavailable".to_string()),
                    }),
                ),
            ))
        }
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    response("alive", None)
}
