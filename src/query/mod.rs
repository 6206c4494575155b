//! # List Queries
//!
//! Filtering, ordering and pagination for the list endpoints.

pub mod filter;
pub mod parser;

pub use filter::{like_pattern, Column, FilterExpr, FilterOperator, FilterSet, FilterValue, OrderBy};
pub use parser::{
    parse_person_query, parse_product_query, ListQuery, PageRequest, QueryError, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
