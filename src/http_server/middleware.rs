//! Request middleware: metrics collection and the bearer-token guard

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::errors::ApiError;
use super::state::SharedState;

/// Record method, route template, status and latency of every matched
/// request.
pub async fn track_metrics(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let response = next.run(request).await;

    state
        .metrics
        .record_request(&method, &endpoint, response.status().as_u16(), start.elapsed());

    response
}

/// Reject requests without a valid access token when `REQUIRE_AUTH` is on
pub async fn require_bearer(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.auth.require_auth {
        return next.run(request).await;
    }

    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.auth.authenticate(authorization) {
        Ok(claims) => {
            tracing::debug!(user = %claims.username, "Authenticated request");
            next.run(request).await
        }
        Err(e) => ApiError::Unauthorized(e.to_string()).into_response(),
    }
}
