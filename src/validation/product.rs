//! # Product Validation
//!
//! Field-level checks only. SKU uniqueness and owner resolution need the
//! store, so [`check_product`] hands back the partial result together with
//! its errors and lets the service add to them.

use serde_json::Value;
use uuid::Uuid;

use super::errors::FieldErrors;
use super::payload::{Payload, TextRule, WriteMode, REQUIRED};
use crate::model::{Field, Price, Product};

pub const NAME_RULE: TextRule = TextRule::new(1, 150);
pub const SKU_RULE: TextRule = TextRule::new(3, 50);

pub const SKU_TAKEN: &str = "A product with this SKU already exists.";
pub const NEGATIVE_PRICE: &str = "Price must be greater than or equal to 0.";
pub const UNKNOWN_OWNER: &str = "Person with this ID does not exist.";

/// A value together with the validation errors found while producing it
#[derive(Debug, Clone)]
pub struct Checked<T> {
    pub value: T,
    pub errors: FieldErrors,
}

impl<T> Checked<T> {
    pub fn into_result(self) -> Result<T, FieldErrors> {
        self.errors.into_result()?;
        Ok(self.value)
    }
}

/// Validated product fields from a write payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Price>,
    /// Owner reference; absent, cleared, or set
    pub owner: Field<Uuid>,
}

impl ProductChanges {
    /// Overwrite the supplied fields on an existing product. The owner
    /// follows the three-state rule.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(sku) = self.sku {
            product.sku = sku;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        product.owner_id = self.owner.apply_to(product.owner_id);
    }

    /// Build a new product. Name, SKU and price must have been supplied.
    pub fn into_product(self) -> Result<Product, FieldErrors> {
        let owner_id = self.owner.apply_to(None);
        match (self.name, self.sku, self.price) {
            (Some(name), Some(sku), Some(price)) => Ok(Product::new(name, sku, price, owner_id)),
            (name, sku, price) => {
                let mut errors = FieldErrors::new();
                if name.is_none() {
                    errors.add("name", REQUIRED);
                }
                if sku.is_none() {
                    errors.add("sku", REQUIRED);
                }
                if price.is_none() {
                    errors.add("price", REQUIRED);
                }
                Err(errors)
            }
        }
    }
}

/// Run the field-level product checks.
///
/// A body that is not an object fails outright; otherwise every field is
/// checked and the errors travel with the partial value.
pub fn check_product(
    body: &Value,
    mode: WriteMode,
) -> Result<Checked<ProductChanges>, FieldErrors> {
    let mut payload = Payload::new(body, mode)?;

    let name = payload.text("name", NAME_RULE);
    let sku = payload.text("sku", SKU_RULE);
    let price = match payload.price("price") {
        Some(price) if price.is_negative() => {
            payload.error("price", NEGATIVE_PRICE);
            None
        }
        other => other,
    };
    let owner = payload.reference("owner_id");

    Ok(Checked {
        value: ProductChanges {
            name,
            sku,
            price,
            owner,
        },
        errors: payload.finish(),
    })
}
