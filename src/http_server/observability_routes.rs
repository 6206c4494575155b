//! Observability HTTP Routes
//!
//! Liveness, readiness and Prometheus metrics. None of these require a
//! token.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::error;

use super::extract::route_both;
use super::state::SharedState;
use crate::observability::METRICS_CONTENT_TYPE;
use crate::store::HealthProbe;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health, readiness and metrics routes
pub fn observability_routes() -> Router<SharedState> {
    let router = route_both(Router::new(), "/healthz", get(health_handler));
    let router = route_both(router, "/readyz", get(readiness_handler));
    route_both(router, "/metrics", get(metrics_handler))
}

/// GET /healthz/
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: state.config.service_name.clone(),
    })
}

/// GET /readyz/
async fn readiness_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                database: "connected",
                error: None,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not ready",
                    database: "disconnected",
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// GET /metrics/
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.metrics.render(),
    )
}
