//! Auth HTTP Routes
//!
//! Token login. Only mounted behaviour changes with `ENABLE_JWT`: when it
//! is off the endpoint answers 501.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tracing::info;

use super::errors::ApiResult;
use super::extract::{json_body, route_both};
use super::state::SharedState;
use crate::auth::{AuthError, TokenPair};

/// Auth routes
pub fn auth_routes() -> Router<SharedState> {
    route_both(Router::new(), "/api/v1/auth/login", post(login_handler))
}

/// POST /api/v1/auth/login/
async fn login_handler(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    if !state.auth.is_enabled() {
        return Err(AuthError::Disabled.into());
    }

    let body = json_body(body)?;
    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    let pair = state.auth.login(username, password).await?;
    info!(username = username.unwrap_or_default(), "Issued token pair");

    Ok(Json(pair))
}
