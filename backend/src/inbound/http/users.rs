//! User endpoints: directory, account, profile and follows.
//!
//! ```text
//! GET   /api/v1/users
//! PATCH /api/v1/users                    {"username":"ada_l","email":"ada@example.com"}
//! GET   /api/v1/users/profile
//! PATCH /api/v1/users/profile            {"fullName":"Ada","about":"…"}
//! POST  /api/v1/users/check-user-availability
//! PATCH /api/v1/users/follow/{userId}
//! GET   /api/v1/users/{userId}
//! ```
//!
//! Literal segments (`profile`, `follow`, `check-user-availability`) must be
//! registered ahead of `{userId}`.

use actix_web::{get, patch, post, web};
use chrono::{DateTime, Utc};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::{Availability, AvailabilityRequest};
use crate::domain::{
    AccountChanges, Error, FollowOutcome, ProfileChanges, Role, User, UserId, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::listing::PageQuery;
use crate::inbound::http::schemas::{MessageResponse, PageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_email, parse_username,
};

/// User as shown to anyone; omits the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "ada_l")]
    pub username: String,
    pub role: Role,
    pub profile: UserProfile,
    pub follower_count: u32,
    pub following_count: u32,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username.into(),
            role: user.role,
            profile: user.profile,
            follower_count: user.follower_count,
            following_count: user.following_count,
            created_at: user.created_at,
        }
    }
}

/// `PATCH /users` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<UpdateAccountRequest> for AccountChanges {
    type Error = Error;

    fn try_from(value: UpdateAccountRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            username: value.username.as_deref().map(parse_username).transpose()?,
            email: value.email.as_deref().map(parse_email).transpose()?,
        })
    }
}

/// `PATCH /users/profile` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub about: Option<String>,
    /// URL of an already-uploaded image.
    pub profile_image: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            full_name: value.full_name,
            about: value.about,
            profile_image: value.profile_image,
        }
    }
}

/// `POST /users/check-user-availability` body.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AvailabilityCheckRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<AvailabilityCheckRequest> for AvailabilityRequest {
    type Error = Error;

    fn try_from(value: AvailabilityCheckRequest) -> Result<Self, Self::Error> {
        if value.username.is_none() && value.email.is_none() {
            return Err(missing_field_error(FieldName::new("username")));
        }
        Ok(Self {
            username: value.username.as_deref().map(parse_username).transpose()?,
            email: value.email.as_deref().map(parse_email).transpose()?,
        })
    }
}

/// Result of a follow toggle.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct FollowResponse {
    pub status: FollowOutcome,
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "userId",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Users page", body = PageSchema<PublicUser>),
        (status = 503, description = "Database unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<PublicUser>>> {
    let page = query.page_request(state.page_defaults.list);
    let users = state.users.list(page).await?;
    Ok(web::Json(users.map(PublicUser::from)))
}

/// Change the session user's username and/or email.
#[utoipa::path(
    patch,
    path = "/api/v1/users",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = MessageResponse<User>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Username or email taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateAccount"
)]
#[patch("/users")]
pub async fn update_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateAccountRequest>,
) -> ApiResult<web::Json<MessageResponse<User>>> {
    let user_id = session.require_user_id()?;
    let changes = AccountChanges::try_from(payload.into_inner())?;
    let user = state.users_command.update_account(user_id, changes).await?;
    Ok(web::Json(MessageResponse::new("Update user successful", user)))
}

/// The session user, including private account fields.
#[utoipa::path(
    get,
    path = "/api/v1/users/profile",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Session user no longer exists", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUserProfile"
)]
#[get("/users/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.users.get(user_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse<User>),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/users/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<MessageResponse<User>>> {
    let user_id = session.require_user_id()?;
    let changes = ProfileChanges::from(payload.into_inner());
    let user = state.users_command.update_profile(user_id, changes).await?;
    Ok(web::Json(MessageResponse::new("Update profile successful", user)))
}

/// Check whether a username and/or email are still free.
#[utoipa::path(
    post,
    path = "/api/v1/users/check-user-availability",
    request_body = AvailabilityCheckRequest,
    responses(
        (status = 200, description = "Availability flags", body = Availability),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["users"],
    operation_id = "checkUserAvailability",
    security([])
)]
#[post("/users/check-user-availability")]
pub async fn check_availability(
    state: web::Data<HttpState>,
    payload: web::Json<AvailabilityCheckRequest>,
) -> ApiResult<web::Json<Availability>> {
    let request = AvailabilityRequest::try_from(payload.into_inner())?;
    Ok(web::Json(state.users.availability(request).await?))
}

/// Follow `userId`, or unfollow when already following.
#[utoipa::path(
    patch,
    path = "/api/v1/users/follow/{userId}",
    params(("userId" = String, Path, description = "User to follow or unfollow")),
    responses(
        (status = 200, description = "Follow toggled", body = MessageResponse<FollowResponse>),
        (status = 400, description = "Self-follow or malformed id", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "toggleFollow"
)]
#[patch("/users/follow/{userId}")]
pub async fn toggle_follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse<FollowResponse>>> {
    let follower = session.require_user_id()?;
    let followee = parse_user_id(&path)?;
    let status = state.users_command.toggle_follow(follower, followee).await?;
    let message = match status {
        FollowOutcome::Followed => "Follow user successful",
        FollowOutcome::Unfollowed => "Unfollow user successful",
    };
    Ok(web::Json(MessageResponse::new(message, FollowResponse { status })))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{userId}",
    params(("userId" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "User", body = PublicUser),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{userId}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicUser>> {
    let id = parse_user_id(&path)?;
    Ok(web::Json(state.users.get(id).await?.into()))
}
