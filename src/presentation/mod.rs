//! # Presentation
//!
//! Response shapes for people and products, and the paginated list
//! envelope.

pub mod pagination;
pub mod person;
pub mod product;

pub use pagination::{page_url, ListResponse};
pub use person::PersonDetail;
pub use product::{ProductDetail, ProductSummary};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// RFC 3339 with microseconds and a `Z` suffix
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn serialize_timestamp<S: Serializer>(
    ts: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}
