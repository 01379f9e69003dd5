//! Tag service implementing [`TagsQuery`] and [`TagsCommand`].
//!
//! Renaming is restricted to administrators; the actor's role is read from
//! the user repository on every rename.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated, paginate};
use tracing::{info, warn};

use crate::domain::ports::{
    TagRepository, TagRepositoryError, TagsCommand, TagsQuery, UserRepository,
};
use crate::domain::user_service::map_user_error;
use crate::domain::{
    Error, NameQuery, OrderKey, ResourceName, Role, Tag, TagId, TagOrder, UserId,
};

/// Tag use-cases over a [`TagRepository`].
#[derive(Clone)]
pub struct TagService<T, U> {
    tags: Arc<T>,
    users: Arc<U>,
}

impl<T, U> TagService<T, U> {
    /// Create a service over the given repositories.
    pub fn new(tags: Arc<T>, users: Arc<U>) -> Self {
        Self { tags, users }
    }
}

fn map_tag_error(error: TagRepositoryError) -> Error {
    match error {
        TagRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tag repository unavailable: {message}"))
        }
        TagRepositoryError::Query { message } => {
            Error::internal(format!("tag repository error: {message}"))
        }
        TagRepositoryError::Conflict { message } => {
            Error::conflict(format!("tag already exists: {message}"))
        }
    }
}

fn tag_not_found(id: TagId) -> Error {
    Error::not_found(format!("tag {id} not found"))
}

impl<T, U> TagService<T, U>
where
    U: UserRepository,
{
    async fn require_admin(&self, actor: &UserId) -> Result<(), Error> {
        let role = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_user_error)?
            .map(|user| user.role);
        match role {
            Some(Role::Admin) => Ok(()),
            Some(Role::User) => {
                warn!(user_id = %actor, "non-admin attempted tag rename");
                Err(Error::forbidden("only administrators may update tags"))
            }
            None => Err(Error::unauthorized("session user no longer exists")),
        }
    }
}

#[async_trait]
impl<T, U> TagsQuery for TagService<T, U>
where
    T: TagRepository,
    U: UserRepository,
{
    async fn list(&self, order: TagOrder, page: PageRequest) -> Result<Paginated<Tag>, Error> {
        let total = self.tags.count().await.map_err(map_tag_error)?;
        let items = self
            .tags
            .list(order, page.window())
            .await
            .map_err(map_tag_error)?;
        Ok(paginate(
            items,
            page.page(),
            page.limit(),
            total,
            Some(order.metadata()),
        ))
    }

    async fn search(&self, query: NameQuery, page: PageRequest) -> Result<Paginated<Tag>, Error> {
        let total = self
            .tags
            .count_by_name(&query)
            .await
            .map_err(map_tag_error)?;
        let items = self
            .tags
            .search_by_name(&query, page.window())
            .await
            .map_err(map_tag_error)?;
        Ok(paginate(items, page.page(), page.limit(), total, None))
    }

    async fn get(&self, id: TagId) -> Result<Tag, Error> {
        self.tags
            .find_by_id(&id)
            .await
            .map_err(map_tag_error)?
            .ok_or_else(|| tag_not_found(id))
    }
}

#[async_trait]
impl<T, U> TagsCommand for TagService<T, U>
where
    T: TagRepository,
    U: UserRepository,
{
    async fn create(&self, name: ResourceName) -> Result<Tag, Error> {
        let tag = self.tags.create(&name).await.map_err(map_tag_error)?;
        info!(tag_id = %tag.id, "tag created");
        Ok(tag)
    }

    async fn rename(&self, actor: UserId, id: TagId, name: ResourceName) -> Result<Tag, Error> {
        self.require_admin(&actor).await?;
        self.tags
            .rename(&id, &name)
            .await
            .map_err(map_tag_error)?
            .ok_or_else(|| tag_not_found(id))
    }
}
