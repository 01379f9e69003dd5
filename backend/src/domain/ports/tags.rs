//! Driving ports for tag use-cases.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, NameQuery, ResourceName, Tag, TagId, TagOrder, UserId};

/// Read-side tag use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagsQuery: Send + Sync {
    /// One page of tags with order metadata attached.
    async fn list(&self, order: TagOrder, page: PageRequest) -> Result<Paginated<Tag>, Error>;

    /// One page of tags matching a name needle.
    async fn search(&self, query: NameQuery, page: PageRequest) -> Result<Paginated<Tag>, Error>;

    /// A single tag; `not_found` when missing.
    async fn get(&self, id: TagId) -> Result<Tag, Error>;
}

/// Write-side tag use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagsCommand: Send + Sync {
    /// Create a tag; `conflict` when the name is taken.
    async fn create(&self, name: ResourceName) -> Result<Tag, Error>;

    /// Rename a tag on behalf of `actor`, who must be an administrator.
    async fn rename(&self, actor: UserId, id: TagId, name: ResourceName) -> Result<Tag, Error>;
}
