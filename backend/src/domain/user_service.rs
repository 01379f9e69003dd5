//! User service implementing [`UsersQuery`] and [`UsersCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated, paginate};
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    Availability, AvailabilityRequest, UserPersistenceError, UserRepository, UsersCommand,
    UsersQuery,
};
use crate::domain::{AccountChanges, Error, FollowOutcome, ProfileChanges, User, UserId};

/// User use-cases over a [`UserRepository`].
#[derive(Clone)]
pub struct UserService<R> {
    users: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a service over the given repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { message } => {
            Error::conflict(format!("username or email already in use: {message}"))
        }
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn list(&self, page: PageRequest) -> Result<Paginated<User>, Error> {
        let total = self.users.count().await.map_err(map_user_error)?;
        let items = self
            .users
            .list(page.window())
            .await
            .map_err(map_user_error)?;
        Ok(paginate(items, page.page(), page.limit(), total, None))
    }

    async fn get(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(&id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(&id))
    }

    async fn availability(&self, request: AvailabilityRequest) -> Result<Availability, Error> {
        let mut availability = Availability::default();
        if let Some(username) = &request.username {
            let taken = self
                .users
                .username_taken(username)
                .await
                .map_err(map_user_error)?;
            availability.username_available = Some(!taken);
        }
        if let Some(email) = &request.email {
            let taken = self.users.email_taken(email).await.map_err(map_user_error)?;
            availability.email_available = Some(!taken);
        }
        Ok(availability)
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn update_account(&self, user: UserId, changes: AccountChanges) -> Result<User, Error> {
        if changes.is_empty() {
            return Err(Error::invalid_request("provide a username or email to update"));
        }
        self.users
            .update_account(&user, &changes)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(&user))
    }

    async fn update_profile(&self, user: UserId, changes: ProfileChanges) -> Result<User, Error> {
        self.users
            .update_profile(&user, &changes)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(&user))
    }

    async fn toggle_follow(
        &self,
        follower: UserId,
        followee: UserId,
    ) -> Result<FollowOutcome, Error> {
        if follower == followee {
            return Err(Error::invalid_request("users cannot follow themselves")
                .with_details(json!({ "field": "userId", "code": "self_follow" })));
        }
        let exists = self
            .users
            .find_by_id(&followee)
            .await
            .map_err(map_user_error)?
            .is_some();
        if !exists {
            return Err(user_not_found(&followee));
        }
        let outcome = self
            .users
            .toggle_follow(&follower, &followee)
            .await
            .map_err(map_user_error)?;
        info!(%follower, %followee, ?outcome, "follow toggled");
        Ok(outcome)
    }
}
