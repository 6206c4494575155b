//! Login endpoint and bearer guard tests

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{app, app_with, TestApp};

async fn jwt_app(require_auth: bool) -> TestApp {
    let app = app_with(|config| {
        config.auth.enable_jwt = true;
        config.auth.require_auth = require_auth;
    })
    .await;
    app.state
        .auth
        .create_user("admin", None, "s3cretpass1")
        .await
        .unwrap();
    app
}

#[tokio::test]
async fn test_login_disabled_returns_501() {
    let app = app().await;

    let response = app
        .post("/api/v1/auth/login/", json!({"username": "a", "password": "b"}))
        .await;
    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert!(response.json()["error"]
        .as_str()
        .unwrap()
        .contains("ENABLE_JWT"));
}

#[tokio::test]
async fn test_login_missing_credentials() {
    let app = jwt_app(false).await;

    let response = app
        .post("/api/v1/auth/login/", json!({"username": "admin"}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Username and password are required");

    let response = app
        .post("/api/v1/auth/login/", json!({"username": "admin", "password": 42}))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_user_look_alike() {
    let app = jwt_app(false).await;

    let wrong = app
        .post("/api/v1/auth/login/", json!({"username": "admin", "password": "nope-nope-1"}))
        .await;
    let unknown = app
        .post("/api/v1/auth/login/", json!({"username": "ghost", "password": "s3cretpass1"}))
        .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json(), unknown.json());
    assert_eq!(wrong.json()["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_login_returns_token_pair() {
    let app = jwt_app(false).await;

    let response = app
        .post("/api/v1/auth/login", json!({"username": "admin", "password": "s3cretpass1"}))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert!(!body["access"].as_str().unwrap().is_empty());
    assert!(!body["refresh"].as_str().unwrap().is_empty());
    assert_ne!(body["access"], body["refresh"]);
}

#[tokio::test]
async fn test_catalog_open_without_require_auth() {
    let app = jwt_app(false).await;
    assert_eq!(app.get("/api/v1/persons/").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_require_auth_guards_catalog_routes() {
    let app = jwt_app(true).await;

    let response = app.get("/api/v1/persons/").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers["www-authenticate"], "Bearer");

    let response = app
        .request("GET", "/api/v1/products/", None, Some("not-a-token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let tokens = app
        .post("/api/v1/auth/login/", json!({"username": "admin", "password": "s3cretpass1"}))
        .await
        .json();

    let access = tokens["access"].as_str().unwrap();
    let response = app.request("GET", "/api/v1/persons/", None, Some(access)).await;
    assert_eq!(response.status, StatusCode::OK);

    let refresh = tokens["refresh"].as_str().unwrap();
    let response = app.request("GET", "/api/v1/persons/", None, Some(refresh)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // health stays open
    assert_eq!(app.get("/healthz/").await.status, StatusCode::OK);
}
