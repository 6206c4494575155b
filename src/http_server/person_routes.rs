//! # Person Routes
//!
//! CRUD and listing for `/api/v1/persons/`.

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
use crate::presentation::{ListResponse, PersonDetail};

/// Create person routes
pub fn person_routes() -> Router<SharedState> {
    let router = route_both(
        Router::new(),
        "/api/v1/persons",
        get(list_persons).post(create_person),
    );
    route_both(
        router,
        "/api/v1/persons/:id",
        get(get_person)
            .put(replace_person)
            .patch(patch_person)
            .delete(delete_person),
    )
}

async fn list_persons(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    uri: Uri,
) -> ApiResult<Json<ListResponse<PersonDetail>>> {
    let listing = state.catalog.list_persons(&params).await?;
    let url = request_url(&headers, &uri, &state.config.server.socket_addr());
    Ok(Json(ListResponse::from_listing(listing, &url, uri.query())))
}

async fn create_person(
    State(state): State<SharedState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PersonDetail>)> {
    let body = json_body(body)?;
    let person = state.catalog.create_person(&body).await?;
    Ok((StatusCode::CREATED, Json(person.into())))
}

async fn get_person(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PersonDetail>> {
    let person = state.catalog.get_person(parse_id(&id)?).await?;
    Ok(Json(person.into()))
}

async fn replace_person(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PersonDetail>> {
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let person = state.catalog.update_person(id, &body, false).await?;
    Ok(Json(person.into()))
}

async fn patch_person(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<PersonDetail>> {
    let id = parse_id(&id)?;
    let body = json_body(body)?;
    let person = state.catalog.update_person(id, &body, true).await?;
    Ok(Json(person.into()))
}

async fn delete_person(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.catalog.delete_person(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
