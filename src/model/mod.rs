//! # Domain Model
//!
//! Person and Product records plus the value types they are built from.
//! These types carry no persistence or HTTP concerns.

pub mod field;
pub mod person;
pub mod price;
pub mod product;

pub use field::Field;
pub use person::Person;
pub use price::{Price, PriceError};
pub use product::{Product, ProductWithOwner};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to microseconds, the precision the store keeps.
///
/// Truncating up front means a freshly created record compares equal to the
/// same record read back from the store.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
