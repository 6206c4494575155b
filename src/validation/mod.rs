//! # Validation
//!
//! Pure checks that turn untrusted JSON bodies into typed change sets or a
//! [`FieldErrors`] map. Nothing here touches the store.

pub mod errors;
pub mod payload;
pub mod person;
pub mod product;

pub use errors::{FieldErrors, NON_FIELD_ERRORS};
pub use payload::{Payload, TextRule, WriteMode};
pub use person::{validate_person, PersonChanges};
pub use product::{check_product, Checked, ProductChanges};
