//! Liveness and readiness endpoints

use axum::{Json, extract::State};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status: "healthy" or "unhealthy"
    pub status: &'static str,
    /// Database connectivity: "connected" or "disconnected"
    pub database: &'static str,
    /// AI service readiness
    pub ai_service: &'static str,
}

/// GET /api/health handler
///
/// Probes the database. A failed probe degrades the body, not the HTTP
/// status; load balancers read the `status` field.
pub async fn handler(State(state): State<AppState>) -> Json<HealthResponse> {
    match state.store().ping().await {
        Ok(()) => Json(HealthResponse {
            status: "healthy",
            database: "connected",
            ai_service: "ready",
        }),
        Err(e) => {
            tracing::error!(error = %e, "Health check database probe failed");
            Json(HealthResponse {
                status: "unhealthy",
                database: "disconnected",
                ai_service: "ready",
            })
        }
    }
}

/// Root banner response
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// GET /api/ handler
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Modelgate is running!",
        status: "healthy",
    })
}
