//! Product response shapes

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::person::PersonDetail;
use crate::model::ProductWithOwner;

/// Detail view: the owner is embedded in full
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    /// Two-decimal string, e.g. `"99.99"`
    pub price: String,
    pub owner: Option<PersonDetail>,
    #[serde(serialize_with = "super::serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<ProductWithOwner> for ProductDetail {
    fn from(record: ProductWithOwner) -> Self {
        let product = record.product;
        Self {
            id: product.id,
            name: product.name,
            sku: product.sku,
            price: product.price.to_string(),
            owner: record.owner.map(PersonDetail::from),
            created_at: product.created_at,
        }
    }
}

/// List view: the owner collapses to a display label
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub owner_name: Option<String>,
    #[serde(serialize_with = "super::serialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<ProductWithOwner> for ProductSummary {
    fn from(record: ProductWithOwner) -> Self {
        let product = record.product;
        Self {
            id: product.id,
            name: product.name,
            sku: product.sku,
            price: product.price.to_string(),
            owner_name: record.owner.map(|owner| owner.to_string()),
            created_at: product.created_at,
        }
    }
}
