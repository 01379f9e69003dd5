//! Tag endpoints. Renaming is reserved for administrators.

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::Paginated;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Error, NameQuery, OrderKey, Tag, TagId, TagOrder};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::{NameSearchQuery, OrderedPageQuery};
use crate::inbound::http::schemas::{MessageResponse, PageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_name};

const NAME: FieldName = FieldName::new("name");
const TAG_ID: FieldName = FieldName::new("tagId");

/// Body for both creating and renaming a tag.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TagNameRequest {
    #[schema(example = "exam-prep")]
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = TagNameRequest,
    responses(
        (status = 201, description = "Tag created", body = MessageResponse<Tag>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Name already taken", body = Error)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TagNameRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let name = parse_name(&payload.name, NAME)?;
    let tag = state.tags_command.create(name).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("Create tag successful", tag)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    params(OrderedPageQuery),
    responses(
        (status = 200, description = "Tags page", body = PageSchema<Tag>),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tags"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    query: web::Query<OrderedPageQuery>,
) -> ApiResult<web::Json<Paginated<Tag>>> {
    let order = TagOrder::parse_or_default(query.order.as_deref());
    let page = query.paging.page_request(state.page_defaults.list);
    Ok(web::Json(state.tags.list(order, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/search",
    params(NameSearchQuery),
    responses(
        (status = 200, description = "Matching tags", body = PageSchema<Tag>),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["tags"],
    operation_id = "searchTags",
    security([])
)]
#[get("/tags/search")]
pub async fn search_tags(
    state: web::Data<HttpState>,
    query: web::Query<NameSearchQuery>,
) -> ApiResult<web::Json<Paginated<Tag>>> {
    let needle = NameQuery::new(query.name.as_deref());
    let page = query.paging.page_request(state.page_defaults.search);
    Ok(web::Json(state.tags.search(needle, page).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{tagId}",
    params(("tagId" = String, Path, description = "Tag UUID")),
    responses(
        (status = 200, description = "Tag", body = Tag),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["tags"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{tagId}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Tag>> {
    let id: TagId = parse_id(&path, TAG_ID)?;
    Ok(web::Json(state.tags.get(id).await?))
}

/// Rename a tag. Administrators only.
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{tagId}",
    params(("tagId" = String, Path, description = "Tag UUID")),
    request_body = TagNameRequest,
    responses(
        (status = 200, description = "Tag renamed", body = MessageResponse<Tag>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not an administrator", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Name already taken", body = Error)
    ),
    tags = ["tags"],
    operation_id = "updateTag"
)]
#[patch("/tags/{tagId}")]
pub async fn update_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<TagNameRequest>,
) -> ApiResult<web::Json<MessageResponse<Tag>>> {
    let actor = session.require_user_id()?;
    let id: TagId = parse_id(&path, TAG_ID)?;
    let name = parse_name(&payload.name, NAME)?;
    let tag = state.tags_command.rename(actor, id, name).await?;
    Ok(web::Json(MessageResponse::new("Update tag successful", tag)))
}
