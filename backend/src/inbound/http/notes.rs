//! Note feed endpoint.
//!
//! ```text
//! GET /api/v1/notes?category=home&order=best&page=1&limit=10
//! ```

use actix_web::{get, web};
use pagination::Paginated;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::NoteFeedRequest;
use crate::domain::{Error, Note, OrderKey, SortKey};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::PageQuery;
use crate::inbound::http::schemas::PageSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_category;

/// `?category=&order=&page=&limit=`
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NoteFeedQuery {
    /// One of `home`, `shared`, `private`, `favorited`, `saved`, `self`.
    pub category: Option<String>,
    /// One of `new`, `old`, `best`, `worst`; unknown values fall back to `new`.
    pub order: Option<String>,
    #[serde(flatten)]
    pub paging: PageQuery,
}

/// Browse notes visible to the viewer.
///
/// Authentication is optional. Viewer-scoped categories return an empty page
/// to anonymous callers.
#[utoipa::path(
    get,
    path = "/api/v1/notes",
    params(NoteFeedQuery),
    responses(
        (status = 200, description = "Feed page", body = PageSchema<Note>),
        (status = 400, description = "Unknown category", body = Error),
        (status = 503, description = "Database unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["notes"],
    operation_id = "listNotes",
    security([])
)]
#[get("/notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<NoteFeedQuery>,
) -> ApiResult<web::Json<Paginated<Note>>> {
    let query = query.into_inner();
    let request = NoteFeedRequest {
        viewer: session.viewer(),
        category: parse_category(query.category.as_deref())?,
        order: SortKey::parse_or_default(query.order.as_deref()),
        page: query.paging.page_request(state.page_defaults.list),
    };
    let page = state.notes.feed(request).await?;
    Ok(web::Json(page))
}

#[cfg(test)]
mod tests;
