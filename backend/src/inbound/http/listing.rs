//! Query-string shapes shared by list and search endpoints.
//!
//! `page`, `limit` and `order` arrive as raw strings so malformed values fall
//! back to defaults instead of failing extraction.

use pagination::PageRequest;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// `?page=&limit=`
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// One-based page index; defaults to 1.
    pub page: Option<String>,
    /// Page size; defaults per endpoint.
    pub limit: Option<String>,
}

impl PageQuery {
    /// Normalize into a page request.
    pub fn page_request(&self, default_limit: u32) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref(), default_limit)
    }
}

/// `?order=&page=&limit=`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct OrderedPageQuery {
    /// Sort key; unknown values fall back to `new`.
    pub order: Option<String>,
    #[serde(flatten)]
    pub paging: PageQuery,
}

/// `?name=&page=&limit=`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NameSearchQuery {
    /// Substring to look for; absent matches every name.
    pub name: Option<String>,
    #[serde(flatten)]
    pub paging: PageQuery,
}
