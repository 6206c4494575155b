//! Product operations
//!
//! Writes check SKU uniqueness against other products and resolve the
//! owner reference before touching the store. The store's own constraints
//! still back both checks.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{CatalogService, Listing, ServiceError, ServiceResult};
use crate::model::{Field, Person, ProductWithOwner};
use crate::query::parse_product_query;
use crate::store::{PersonStore, ProductStore};
use crate::validation::product::{SKU_TAKEN, UNKNOWN_OWNER};
use crate::validation::{check_product, FieldErrors, ProductChanges, WriteMode};

impl<S: PersonStore + ProductStore> CatalogService<S> {
    pub async fn create_product(&self, body: &Value) -> ServiceResult<ProductWithOwner> {
        let checked = check_product(body, WriteMode::Create)?;
        let mut errors = checked.errors;
        let changes = checked.value;

        self.check_sku(&changes, None, &mut errors).await?;
        let owner = self.resolve_owner(changes.owner, &mut errors).await?;
        errors.into_result()?;

        let product = changes.into_product()?;
        self.store.insert_product(&product).await?;
        debug!(id = %product.id, sku = %product.sku, "Created product");

        Ok(ProductWithOwner::new(product, owner.apply_to(None)))
    }

    pub async fn get_product(&self, id: Uuid) -> ServiceResult<ProductWithOwner> {
        self.store
            .get_product(id)
            .await?
            .ok_or_else(ServiceError::not_found)
    }

    /// PUT when `partial` is false, PATCH when true. In both, an absent
    /// `owner_id` leaves the owner as it was.
    pub async fn update_product(
        &self,
        id: Uuid,
        body: &Value,
        partial: bool,
    ) -> ServiceResult<ProductWithOwner> {
        let existing = self.get_product(id).await?;

        let mode = if partial { WriteMode::Partial } else { WriteMode::Replace };
        let checked = check_product(body, mode)?;
        let mut errors = checked.errors;
        let changes = checked.value;

        self.check_sku(&changes, Some(id), &mut errors).await?;
        let owner = self.resolve_owner(changes.owner, &mut errors).await?;
        errors.into_result()?;

        let mut product = existing.product;
        changes.apply(&mut product);
        let owner = owner.apply_to(existing.owner);

        if !self.store.update_product(&product).await? {
            return Err(ServiceError::not_found());
        }
        debug!(id = %product.id, partial, "Updated product");

        Ok(ProductWithOwner::new(product, owner))
    }

    pub async fn delete_product(&self, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_product(id).await? {
            return Err(ServiceError::not_found());
        }
        debug!(id = %id, "Deleted product");
        Ok(())
    }

    pub async fn list_products(
        &self,
        params: &HashMap<String, String>,
    ) -> ServiceResult<Listing<ProductWithOwner>> {
        let query = parse_product_query(params, self.page_size)?;
        let page = self.store.query_products(&query).await?;
        Listing::checked(page, query.page)
    }

    /// Record a `sku` error if another product already uses the new SKU.
    async fn check_sku(
        &self,
        changes: &ProductChanges,
        this_product: Option<Uuid>,
        errors: &mut FieldErrors,
    ) -> ServiceResult<()> {
        if let Some(sku) = &changes.sku {
            if self.store.sku_exists(sku, this_product).await? {
                errors.add("sku", SKU_TAKEN);
            }
        }
        Ok(())
    }

    /// Look up the referenced owner, recording an `owner_id` error if it
    /// does not exist.
    async fn resolve_owner(
        &self,
        owner: Field<Uuid>,
        errors: &mut FieldErrors,
    ) -> ServiceResult<Field<Person>> {
        match owner {
            Field::Missing => Ok(Field::Missing),
            Field::Null => Ok(Field::Null),
            Field::Value(id) => match self.store.get_person(id).await? {
                Some(person) => Ok(Field::Value(person)),
                None => {
                    errors.add("owner_id", UNKNOWN_OWNER);
                    Ok(Field::Missing)
                }
            },
        }
    }
}
