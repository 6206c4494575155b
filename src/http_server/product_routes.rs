//! # Product Routes
//!
//! CRUD and listing for `/api/v1/products/`. Listings carry the owner's
//! display name; single-record responses embed the full owner.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use super::errors::ApiResult;
use super::extract::{json_body, parse_id, request_url, route_both};
use super::state::SharedState;
use crate::presentation::{ListResponse, ProductDetail, ProductSummary};

/// Create product routes
pub fn product_routes() -> Router<SharedState> {
    let router = route_both(
        Router::new(),
        "/api/v1/products",
        get(list_products).post(create_product),
    );
    route_both(
        router,
        "/api/v1/products/:id",
        get(get_product)
            .put(replace_product)
            .patch(patch_product)
            .delete(delete_product),
    )
}

async fn list_products(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> ApiResult<Json<ListResponse<ProductSummary>>> {
    let listing = state.catalog.list_products(&params).await?;
    let url = request_url(&headers, &uri, &state.config.server.socket_addr());
    Ok(Json(ListResponse::from_listing(listing, &url, uri.query())))
}

async fn create_product(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProductDetail>)> {
    let body = json_body(body)?;
    let product = state.catalog.create_product(&body).await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

async fn get_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProductDetail>> {
    let product = state.catalog.get_product(parse_id(&id)?).await?;
    Ok(Json(product.into()))
}

async fn replace_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProductDetail>> {
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let product = state.catalog.update_product(id, &body, false).await?;
    Ok(Json(product.into()))
}

async fn patch_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ProductDetail>> {
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let product = state.catalog.update_product(id, &body, true).await?;
    Ok(Json(product.into()))
}

async fn delete_product(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_product(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
