//! catalog-api - people and products over HTTP
//!
//! Layers, bottom up: `model` and `validation` hold the domain rules,
//! `query` turns list parameters into typed filters, `store` persists to
//! SQLite, `service` composes them, and `http_server` exposes the result.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod presentation;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;
