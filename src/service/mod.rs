//! # Catalog Service
//!
//! Store-backed operations for people and products. Pure validation runs
//! first; uniqueness and owner checks that need the store are merged into
//! the same error map so the caller sees every problem at once.

pub mod persons;
pub mod products;

use std::sync::Arc;

use thiserror::Error;

use crate::query::{PageRequest, QueryError};
use crate::store::{Page, StoreError};
use crate::validation::product::{SKU_TAKEN, UNKNOWN_OWNER};
use crate::validation::{FieldErrors, NON_FIELD_ERRORS};

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

pub const NOT_FOUND: &str = "Not found.";
pub const INVALID_PAGE: &str = "Invalid page.";

/// Service-level failures
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Payload or query parameters failed validation
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// Record or page does not exist
    #[error("{0}")]
    NotFound(String),

    /// The store rejected a write as a duplicate
    #[error("conflict: {0}")]
    Conflict(FieldErrors),

    /// Any other store failure
    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found() -> Self {
        ServiceError::NotFound(NOT_FOUND.to_string())
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<QueryError> for ServiceError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::InvalidParams(errors) => ServiceError::Validation(errors),
            QueryError::InvalidPage => ServiceError::NotFound(INVALID_PAGE.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { field } => {
                let message = unique_message(&field);
                ServiceError::Conflict(FieldErrors::single(field, message))
            }
            StoreError::ForeignKeyViolation => {
                ServiceError::Validation(FieldErrors::single("owner_id", UNKNOWN_OWNER))
            }
            other => ServiceError::Store(other),
        }
    }
}

fn unique_message(field: &str) -> &'static str {
    match field {
        "email" => "person with this email already exists.",
        "sku" => SKU_TAKEN,
        "username" => "A user with that username already exists.",
        NON_FIELD_ERRORS => "A record with these values already exists.",
        _ => "This value is already in use.",
    }
}

/// One page of results along with what is needed to link neighbours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: PageRequest,
}

impl<T> Listing<T> {
    /// Reject pages past the end; page 1 of an empty set is fine.
    fn checked(page: Page<T>, request: PageRequest) -> ServiceResult<Self> {
        if request.is_beyond(page.total) {
            return Err(ServiceError::NotFound(INVALID_PAGE.to_string()));
        }
        Ok(Self {
            items: page.items,
            total: page.total,
            page: request,
        })
    }

    pub fn has_next(&self) -> bool {
        self.page.number.saturating_mul(self.page.size) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.page.number > 1
    }
}

/// Entry point for catalog operations
pub struct CatalogService<S> {
    store: Arc<S>,
    page_size: usize,
}

impl<S> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            page_size: self.page_size,
        }
    }
}

impl<S> CatalogService<S> {
    pub fn new(store: Arc<S>, page_size: usize) -> Self {
        Self { store, page_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_becomes_field_conflict() {
        let err = ServiceError::from(StoreError::UniqueViolation {
            field: "email".into(),
        });
        match err {
            ServiceError::Conflict(errors) => assert_eq!(
                errors.messages("email"),
                ["person with this email already exists.".to_string()]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_page_is_not_found() {
        let err = ServiceError::from(QueryError::InvalidPage);
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == INVALID_PAGE));
    }

    #[test]
    fn test_listing_links() {
        let page = Page {
            items: vec![1, 2],
            total: 25,
        };
        let listing = Listing::checked(page, PageRequest::new(1, 20)).unwrap();
        assert!(listing.has_next());
        assert!(!listing.has_previous());

        let beyond = Page::<u8> {
            items: vec![],
            total: 25,
        };
        assert!(Listing::checked(beyond, PageRequest::new(3, 20)).is_err());
    }
}
