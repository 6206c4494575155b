//! # Catalog HTTP Server Module
//!
//! Axum server exposing the catalog over JSON.
//!
//! # Endpoints
//!
//! - `/healthz/`, `/readyz/` - Liveness and readiness
//! - `/metrics/` - Prometheus text exposition
//! - `/api/v1/auth/login/` - Token login
//! - `/api/v1/persons/` - Person CRUD and listing
//! - `/api/v1/products/` - Product CRUD and listing

pub mod auth_routes;
pub mod config;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod observability_routes;
pub mod person_routes;
pub mod product_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use state::{AppState, SharedState};
