//! # Product

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::person::Person;
use super::price::Price;

/// A product, optionally owned by a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Unique identifier, generated at creation
    pub id: Uuid,

    pub name: String,

    /// Unique stock keeping unit
    pub sku: String,

    pub price: Price,

    /// Owning person, by reference
    pub owner_id: Option<Uuid>,

    /// When the product was created
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, sku: String, price: Price, owner_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            sku,
            price,
            owner_id,
            created_at: super::now(),
        }
    }
}

/// A product read together with its owner, as the store returns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductWithOwner {
    pub product: Product,
    pub owner: Option<Person>,
}

impl ProductWithOwner {
    pub fn new(product: Product, owner: Option<Person>) -> Self {
        Self { product, owner }
    }
}
