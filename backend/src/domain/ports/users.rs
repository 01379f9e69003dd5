//! Driving ports for user-facing queries and account commands.
//!
//! Inbound adapters use these ports to read and change users without
//! importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AccountChanges, Email, Error, FollowOutcome, ProfileChanges, User, UserId, Username,
};

/// Candidate identity values to check before sign-up or rename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilityRequest {
    pub username: Option<Username>,
    pub email: Option<Email>,
}

/// Availability flags; a field is omitted when it was not asked about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_available: Option<bool>,
}

/// Read-side user use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// One page of users.
    async fn list(&self, page: PageRequest) -> Result<Paginated<User>, Error>;

    /// A single user; `not_found` when missing.
    async fn get(&self, id: UserId) -> Result<User, Error>;

    /// Check whether a username and/or email are still free.
    async fn availability(&self, request: AvailabilityRequest) -> Result<Availability, Error>;
}

/// Write-side user use-cases, always acting on behalf of the session user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Change username and/or email; `conflict` when either is taken.
    async fn update_account(
        &self,
        user: UserId,
        changes: AccountChanges,
    ) -> Result<User, Error>;

    /// Change profile fields.
    async fn update_profile(
        &self,
        user: UserId,
        changes: ProfileChanges,
    ) -> Result<User, Error>;

    /// Follow or unfollow another user.
    async fn toggle_follow(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<FollowOutcome, Error>;
}
