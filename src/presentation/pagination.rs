//! # Pagination Envelope

use serde::Serialize;

use crate::service::Listing;

/// List response with absolute links to neighbouring pages
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    /// Build the envelope for `listing`. `url` is the absolute request URL
    /// without its query string; `raw_query` is the query as received.
    pub fn from_listing<U>(listing: Listing<U>, url: &str, raw_query: Option<&str>) -> Self
    where
        U: Into<T>,
    {
        let next = listing
            .has_next()
            .then(|| page_url(url, raw_query, listing.page.number + 1));
        let previous = listing
            .has_previous()
            .then(|| page_url(url, raw_query, listing.page.number - 1));

        Self {
            count: listing.total,
            next,
            previous,
            results: listing.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// `url` with its `page` parameter replaced. Page 1 drops the parameter.
pub fn page_url(url: &str, raw_query: Option<&str>, page: usize) -> String {
    let mut parts: Vec<String> = raw_query
        .unwrap_or("")
        .split('&')
        .filter(|part| !part.is_empty())
        .filter(|part| part.split('=').next() != Some("page"))
        .map(str::to_string)
        .collect();

    if page > 1 {
        parts.push(format!("page={}", page));
    }

    if parts.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, parts.join("&"))
    }
}
