//! # Query Parameter Parser
//!
//! Parses list query parameters into filters, ordering and a page request.

use std::collections::HashMap;

use thiserror::Error;

use super::filter::{Column, FilterExpr, FilterSet, OrderBy};
use crate::model::Price;
use crate::validation::FieldErrors;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on a configured page size
pub const MAX_PAGE_SIZE: usize = 1000;

const PERSON_ORDERING: &[Column] = &[Column::CreatedAt];
const PRODUCT_ORDERING: &[Column] = &[Column::Price, Column::CreatedAt];

/// Query parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// One or more parameters failed to parse
    #[error("invalid query parameters: {0}")]
    InvalidParams(FieldErrors),

    /// `page` is not a positive integer
    #[error("Invalid page.")]
    InvalidPage,
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }

    /// Page `number` of `size`, provided its offset fits a SQL integer.
    pub fn checked(number: usize, size: usize) -> Result<Self, QueryError> {
        if number == 0 {
            return Err(QueryError::InvalidPage);
        }
        let offset = (number - 1)
            .checked_mul(size)
            .ok_or(QueryError::InvalidPage)?;
        if i64::try_from(offset).is_err() {
            return Err(QueryError::InvalidPage);
        }
        Ok(Self { number, size })
    }

    pub fn offset(&self) -> usize {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    /// Whether this page lies past the end of `total` records.
    /// Page 1 is always valid, even over an empty set.
    pub fn is_beyond(&self, total: usize) -> bool {
        self.number > 1 && self.offset() >= total
    }
}

/// A parsed list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: FilterSet,
    pub order: Vec<OrderBy>,
    pub page: PageRequest,
}

/// Parse `/persons/` list parameters
pub fn parse_person_query(
    params: &HashMap<String, String>,
    page_size: usize,
) -> Result<ListQuery, QueryError> {
    let mut filters = FilterSet::new();
    let mut errors = FieldErrors::new();

    if let Some(email) = non_empty(params, "email") {
        filters.push(FilterExpr::icontains(Column::Email, email));
    }
    if let Some(last_name) = non_empty(params, "last_name") {
        filters.push(FilterExpr::icontains(Column::LastName, last_name));
    }

    let order = parse_ordering(params, PERSON_ORDERING, &mut errors);
    finish(params, filters, order, errors, page_size)
}

/// Parse `/products/` list parameters
pub fn parse_product_query(
    params: &HashMap<String, String>,
    page_size: usize,
) -> Result<ListQuery, QueryError> {
    let mut filters = FilterSet::new();
    let mut errors = FieldErrors::new();

    if let Some(sku) = non_empty(params, "sku") {
        filters.push(FilterExpr::icontains(Column::Sku, sku));
    }
    if let Some(min) = parse_price(params, "price_min", &mut errors) {
        filters.push(FilterExpr::gte(Column::Price, min));
    }
    if let Some(max) = parse_price(params, "price_max", &mut errors) {
        filters.push(FilterExpr::lte(Column::Price, max));
    }
    if let Some(q) = non_empty(params, "q") {
        filters.push(FilterExpr::icontains(Column::Name, q));
    }
    if let Some(search) = non_empty(params, "search") {
        for term in search_terms(search) {
            filters.push(FilterExpr::icontains(Column::Name, term));
        }
    }

    let order = parse_ordering(params, PRODUCT_ORDERING, &mut errors);
    finish(params, filters, order, errors, page_size)
}

fn finish(
    params: &HashMap<String, String>,
    filters: FilterSet,
    order: Vec<OrderBy>,
    errors: FieldErrors,
    page_size: usize,
) -> Result<ListQuery, QueryError> {
    errors.into_result().map_err(QueryError::InvalidParams)?;
    let page = PageRequest::checked(parse_page(params)?, page_size)?;
    Ok(ListQuery {
        filters,
        order,
        page,
    })
}

/// Trimmed parameter value, treating empty as absent
fn non_empty<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_price(
    params: &HashMap<String, String>,
    key: &str,
    errors: &mut FieldErrors,
) -> Option<Price> {
    let raw = non_empty(params, key)?;
    match Price::parse(raw) {
        Ok(price) => Some(price),
        Err(_) => {
            errors.add(key, "Enter a number.");
            None
        }
    }
}

/// Split a search string on whitespace and commas
pub fn search_terms(search: &str) -> impl Iterator<Item = &str> {
    search
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
}

/// Parse `ordering`, e.g. `-created_at` or `price,-created_at`.
/// Absent or empty yields newest first.
fn parse_ordering(
    params: &HashMap<String, String>,
    allowed: &[Column],
    errors: &mut FieldErrors,
) -> Vec<OrderBy> {
    let default = vec![OrderBy::desc(Column::CreatedAt)];
    let Some(value) = non_empty(params, "ordering") else {
        return default;
    };

    let mut order = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, descending) = match part.strip_prefix('-') {
            Some(name) => (name, true),
            None => (part, false),
        };

        match allowed.iter().find(|c| c.api_name() == name) {
            Some(&column) => order.push(OrderBy { column, descending }),
            None => {
                let names: Vec<&str> = allowed.iter().map(|c| c.api_name()).collect();
                errors.add(
                    "ordering",
                    format!(
                        "Invalid ordering field \"{}\". Choose from: {}.",
                        name,
                        names.join(", ")
                    ),
                );
            }
        }
    }

    if order.is_empty() {
        default
    } else {
        order
    }
}

fn parse_page(params: &HashMap<String, String>) -> Result<usize, QueryError> {
    match non_empty(params, "page") {
        None => Ok(1),
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(QueryError::InvalidPage),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::{FilterOperator, FilterValue};

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let query = parse_person_query(&HashMap::new(), 20).unwrap();
        assert!(query.filters.is_empty());
        assert_eq!(query.order, vec![OrderBy::desc(Column::CreatedAt)]);
        assert_eq!(query.page, PageRequest::new(1, 20));
    }

    #[test]
    fn test_person_filters() {
        let query =
            parse_person_query(&params(&[("email", "ex"), ("last_name", " ")]), 20).unwrap();
        assert_eq!(query.filters.len(), 1);
        let expr = query.filters.iter().next().unwrap();
        assert_eq!(expr.column, Column::Email);
        assert_eq!(expr.value, FilterValue::Text("ex".into()));
    }

    #[test]
    fn test_price_range() {
        let query = parse_product_query(
            &params(&[("price_min", "20.00"), ("price_max", "80.00")]),
            20,
        )
        .unwrap();
        let ops: Vec<FilterOperator> = query.filters.iter().map(|f| f.operator).collect();
        assert_eq!(ops, vec![FilterOperator::Gte, FilterOperator::Lte]);
    }

    #[test]
    fn test_bad_price_bound() {
        let err = parse_product_query(&params(&[("price_min", "cheap")]), 20).unwrap_err();
        match err {
            QueryError::InvalidParams(errors) => {
                assert_eq!(errors.messages("price_min"), ["Enter a number.".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_search_splits_terms_and_ands_with_q() {
        let raw = params(&[("q", "pro"), ("search", "red, large")]);
        let query = parse_product_query(&raw, 20).unwrap();
        let names: Vec<Column> = query.filters.iter().map(|f| f.column).collect();
        assert_eq!(names, vec![Column::Name, Column::Name, Column::Name]);
    }

    #[test]
    fn test_ordering() {
        let query = parse_product_query(&params(&[("ordering", "price,-created_at")]), 20).unwrap();
        assert_eq!(
            query.order,
            vec![OrderBy::asc(Column::Price), OrderBy::desc(Column::CreatedAt)]
        );
    }

    #[test]
    fn test_unknown_ordering_rejected() {
        let err = parse_person_query(&params(&[("ordering", "price")]), 20).unwrap_err();
        assert!(matches!(err, QueryError::InvalidParams(ref e) if e.contains("ordering")));
    }

    #[test]
    fn test_page() {
        let query = parse_person_query(&params(&[("page", "3")]), 20).unwrap();
        assert_eq!(query.page.offset(), 40);

        for bad in ["0", "-1", "abc"] {
            assert_eq!(
                parse_person_query(&params(&[("page", bad)]), 20).unwrap_err(),
                QueryError::InvalidPage
            );
        }
    }

    #[test]
    fn test_huge_page_is_invalid() {
        for huge in ["18446744073709551615", "461168601842738793"] {
            assert_eq!(
                parse_person_query(&params(&[("page", huge)]), 20).unwrap_err(),
                QueryError::InvalidPage
            );
        }
        assert_eq!(
            parse_person_query(&params(&[("page", "18446744073709551616")]), 20).unwrap_err(),
            QueryError::InvalidPage
        );
    }

    #[test]
    fn test_checked_page_bounds() {
        assert_eq!(PageRequest::checked(1, 20), Ok(PageRequest::new(1, 20)));
        assert_eq!(PageRequest::checked(0, 20), Err(QueryError::InvalidPage));
        assert_eq!(PageRequest::checked(usize::MAX, 20), Err(QueryError::InvalidPage));
        assert!(PageRequest::checked(1_000_000, 1000).is_ok());
    }

    #[test]
    fn test_is_beyond() {
        assert!(!PageRequest::new(1, 20).is_beyond(0));
        assert!(!PageRequest::new(2, 20).is_beyond(25));
        assert!(PageRequest::new(3, 20).is_beyond(25));
    }
}
