//! # Entity Store
//!
//! Repository traits for people and products, and their SQLite
//! implementation. Uniqueness and the owner foreign key are enforced here;
//! callers treat any pre-checks of their own as advisory.

pub mod errors;
pub mod schema;
pub mod sqlite;

pub use errors::{StoreError, StoreResult};
pub use sqlite::SqlStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Person, Product, ProductWithOwner};
use crate::query::ListQuery;

/// One page of a list query plus the total number of matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[async_trait]
pub trait PersonStore: Send + Sync {
    async fn insert_person(&self, person: &Person) -> StoreResult<()>;

    async fn get_person(&self, id: Uuid) -> StoreResult<Option<Person>>;

    /// Returns false when no person has this id
    async fn update_person(&self, person: &Person) -> StoreResult<bool>;

    /// Returns false when no person has this id. Owned products keep
    /// existing with their owner cleared.
    async fn delete_person(&self, id: Uuid) -> StoreResult<bool>;

    async fn query_persons(&self, query: &ListQuery) -> StoreResult<Page<Person>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert_product(&self, product: &Product) -> StoreResult<()>;

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<ProductWithOwner>>;

    /// Returns false when no product has this id
    async fn update_product(&self, product: &Product) -> StoreResult<bool>;

    async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;

    /// Whether any product other than `excluding` already uses `sku`
    async fn sku_exists(&self, sku: &str, excluding: Option<Uuid>) -> StoreResult<bool>;

    async fn query_products(&self, query: &ListQuery) -> StoreResult<Page<ProductWithOwner>>;
}

/// Liveness check against the backing database
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}
