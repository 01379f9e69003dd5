//! Study endpoints.
//!
//! ```text
//! POST  /api/v1/studies
//! GET   /api/v1/studies?order=most-notes&page=1&limit=10
//! GET   /api/v1/studies/search?name=alg
//! GET   /api/v1/studies/{studyId}
//! PATCH /api/v1/studies/{studyId}
//! ```
//!
//! `search` must be registered ahead of `{studyId}` so the literal segment
//! wins.

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::Paginated;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{
    Error, NameQuery, OrderKey, Study, StudyChanges, StudyDraft, StudyId, StudyOrder,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::{NameSearchQuery, OrderedPageQuery};
use crate::inbound::http::schemas::{MessageResponse, PageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_name};

const NAME: FieldName = FieldName::new("name");
const STUDY_ID: FieldName = FieldName::new("studyId");

/// `POST /studies` body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateStudyRequest {
    #[schema(example = "Linear algebra")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// URL of an already-uploaded image.
    pub image: Option<String>,
}

impl TryFrom<CreateStudyRequest> for StudyDraft {
    type Error = Error;

    fn try_from(value: CreateStudyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: parse_name(&value.name, NAME)?,
            description: value.description,
            image: value.image,
        })
    }
}

/// `PATCH /studies/{studyId}` body; omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateStudyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl TryFrom<UpdateStudyRequest> for StudyChanges {
    type Error = Error;

    fn try_from(value: UpdateStudyRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .as_deref()
                .map(|name| parse_name(name, NAME))
                .transpose()?,
            description: value.description,
            image: value.image,
        })
    }
}

/// Create a study.
#[utoipa::path(
    post,
    path = "/api/v1/studies",
    request_body = CreateStudyRequest,
    responses(
        (status = 201, description = "Study created", body = MessageResponse<Study>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Conflict", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["studies"],
    operation_id = "createStudy"
)]
#[post("/studies")]
pub async fn create_study(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateStudyRequest>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let draft = StudyDraft::try_from(payload.into_inner())?;
    let study = state.studies_command.create(draft).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("Create study successful", study)))
}

/// List studies.
#[utoipa::path(
    get,
    path = "/api/v1/studies",
    params(OrderedPageQuery),
    responses(
        (status = 200, description = "Studies page", body = PageSchema<Study>),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["studies"],
    operation_id = "listStudies",
    security([])
)]
#[get("/studies")]
pub async fn list_studies(
    state: web::Data<HttpState>,
    query: web::Query<OrderedPageQuery>,
) -> ApiResult<web::Json<Paginated<Study>>> {
    let order = StudyOrder::parse_or_default(query.order.as_deref());
    let page = query.paging.page_request(state.page_defaults.list);
    Ok(web::Json(state.studies.list(order, page).await?))
}

/// Search studies by name.
#[utoipa::path(
    get,
    path = "/api/v1/studies/search",
    params(NameSearchQuery),
    responses(
        (status = 200, description = "Matching studies", body = PageSchema<Study>),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["studies"],
    operation_id = "searchStudies",
    security([])
)]
#[get("/studies/search")]
pub async fn search_studies(
    state: web::Data<HttpState>,
    query: web::Query<NameSearchQuery>,
) -> ApiResult<web::Json<Paginated<Study>>> {
    let needle = NameQuery::new(query.name.as_deref());
    let page = query.paging.page_request(state.page_defaults.search);
    Ok(web::Json(state.studies.search(needle, page).await?))
}

/// Fetch one study.
#[utoipa::path(
    get,
    path = "/api/v1/studies/{studyId}",
    params(("studyId" = String, Path, description = "Study UUID")),
    responses(
        (status = 200, description = "Study", body = Study),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["studies"],
    operation_id = "getStudy",
    security([])
)]
#[get("/studies/{studyId}")]
pub async fn get_study(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Study>> {
    let id: StudyId = parse_id(&path, STUDY_ID)?;
    Ok(web::Json(state.studies.get(id).await?))
}

/// Partially update a study.
#[utoipa::path(
    patch,
    path = "/api/v1/studies/{studyId}",
    params(("studyId" = String, Path, description = "Study UUID")),
    request_body = UpdateStudyRequest,
    responses(
        (status = 200, description = "Study updated", body = MessageResponse<Study>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["studies"],
    operation_id = "updateStudy"
)]
#[patch("/studies/{studyId}")]
pub async fn update_study(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateStudyRequest>,
) -> ApiResult<web::Json<MessageResponse<Study>>> {
    session.require_user_id()?;
    let id: StudyId = parse_id(&path, STUDY_ID)?;
    let changes = StudyChanges::try_from(payload.into_inner())?;
    let study = state.studies_command.update(id, changes).await?;
    Ok(web::Json(MessageResponse::new("Update study successful", study)))
}
