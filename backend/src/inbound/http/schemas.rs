//! Response wrappers and OpenAPI schemas for shared envelopes.
//!
//! [`pagination::Paginated`] stays free of documentation concerns; the
//! [`PageSchema`] mirror documents its wire shape here.

use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by create and update endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse<T> {
    #[schema(example = "Create study successful")]
    pub message: &'static str,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self { message, data }
    }
}

/// OpenAPI mirror of [`pagination::Paginated`].
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageSchema<T> {
    data: Vec<T>,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 10)]
    limit: u32,
    #[schema(example = 42)]
    total_data: u64,
    #[schema(example = 5)]
    total_page: u64,
    /// Applied sort key; present on ordered listings.
    #[schema(example = "new")]
    order: Option<String>,
    /// Accepted sort keys; present on ordered listings.
    order_available: Option<Vec<String>>,
}
