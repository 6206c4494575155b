//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

const UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

/// Failures surfaced by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: String },

    /// A foreign key constraint rejected the write
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    /// A stored value could not be decoded
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// Any other driver or connection failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    pub fn corrupt(what: impl Into<String>) -> Self {
        StoreError::Corrupt(what.into())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation {
                    field: unique_field(db.message()),
                };
            }
            if db.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation;
            }
        }
        StoreError::Database(e)
    }
}

/// Column named in a SQLite unique violation message, e.g.
/// `UNIQUE constraint failed: persons.email` → `email`.
fn unique_field(message: &str) -> String {
    message
        .strip_prefix(UNIQUE_PREFIX)
        .and_then(|cols| cols.split(',').next())
        .and_then(|col| col.trim().rsplit('.').next())
        .unwrap_or("non_field_errors")
        .to_string()
}
