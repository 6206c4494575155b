//! # Filter Expression AST
//!
//! Typed list filters. The store compiles these into parameterised SQL;
//! user input only ever travels as bound values.

use crate::model::Price;

/// Columns that list queries may filter or order on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Email,
    LastName,
    Name,
    Sku,
    Price,
    CreatedAt,
}

impl Column {
    /// Column name in the relational schema
    pub fn sql_name(&self) -> &'static str {
        match self {
            Column::Email => "email",
            Column::LastName => "last_name",
            Column::Name => "name",
            Column::Sku => "sku",
            Column::Price => "price_cents",
            Column::CreatedAt => "created_at",
        }
    }

    /// Name clients use for this column in `ordering`
    pub fn api_name(&self) -> &'static str {
        match self {
            Column::Email => "email",
            Column::LastName => "last_name",
            Column::Name => "name",
            Column::Sku => "sku",
            Column::Price => "price",
            Column::CreatedAt => "created_at",
        }
    }
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Case-insensitive substring match
    IContains,

    /// Greater than or equal
    Gte,

    /// Less than or equal
    Lte,
}

/// Bound value of a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Price(Price),
}

/// A single filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpr {
    pub column: Column,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl FilterExpr {
    pub fn new(column: Column, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            column,
            operator,
            value,
        }
    }

    pub fn icontains(column: Column, text: impl Into<String>) -> Self {
        Self::new(column, FilterOperator::IContains, FilterValue::Text(text.into()))
    }

    pub fn gte(column: Column, price: Price) -> Self {
        Self::new(column, FilterOperator::Gte, FilterValue::Price(price))
    }

    pub fn lte(column: Column, price: Price) -> Self {
        Self::new(column, FilterOperator::Lte, FilterValue::Price(price))
    }
}

/// Conjunction of filters. Empty means no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    exprs: Vec<FilterExpr>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, expr: FilterExpr) {
        self.exprs.push(expr);
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterExpr> {
        self.exprs.iter()
    }
}

/// Order by clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: Column,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            descending: false,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Escape character used in LIKE clauses built from [`like_pattern`]
pub const LIKE_ESCAPE: char = '\\';

/// Lowercased `%term%` pattern with LIKE metacharacters escaped.
///
/// Folds ASCII only, matching SQLite's `LOWER()` on the column side.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
