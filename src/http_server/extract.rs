//! Request helpers shared by the resource handlers

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap, Uri};
use axum::routing::MethodRouter;
use axum::{Json, Router};
use serde_json::Value;
use uuid::Uuid;

use super::errors::{ApiError, ApiResult};

/// Register `path` both with and without a trailing slash
pub fn route_both<S>(router: Router<S>, path: &str, method: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route(path, method.clone())
        .route(&format!("{}/", path), method)
}

/// A path id that is not a UUID names no record
pub fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found())
}

/// Unwrap a JSON body, mapping rejections to API errors
pub fn json_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Absolute URL of the request without its query string.
///
/// Honours `X-Forwarded-Proto` and falls back to `fallback_host` when the
/// request carries no `Host` header.
pub fn request_url(headers: &HeaderMap, uri: &Uri, fallback_host: &str) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or(fallback_host);

    format!("{}://{}{}", scheme, host, uri.path())
}
