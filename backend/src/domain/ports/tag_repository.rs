//! Port abstraction for tag persistence and an in-memory fixture.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageWindow;

use crate::domain::{NameQuery, ResourceName, Tag, TagId, TagOrder};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tag repository query failed: {message}",
        /// Tag names are unique.
        Conflict { message: String } => "tag already exists: {message}",
    }
}

/// Persistence for tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Insert a new tag.
    async fn create(&self, name: &ResourceName) -> Result<Tag, TagRepositoryError>;

    /// Return a window of tags sorted by `order`.
    async fn list(
        &self,
        order: TagOrder,
        window: PageWindow,
    ) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Count all tags.
    async fn count(&self) -> Result<u64, TagRepositoryError>;

    /// Return a window of tags whose name contains the needle, ignoring case.
    async fn search_by_name(
        &self,
        query: &NameQuery,
        window: PageWindow,
    ) -> Result<Vec<Tag>, TagRepositoryError>;

    /// Count tags whose name contains the needle, respecting case.
    async fn count_by_name(&self, query: &NameQuery) -> Result<u64, TagRepositoryError>;

    /// Fetch a tag by identifier.
    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagRepositoryError>;

    /// Rename a tag; `None` when the tag does not exist.
    async fn rename(
        &self,
        id: &TagId,
        name: &ResourceName,
    ) -> Result<Option<Tag>, TagRepositoryError>;
}

/// In-memory tag repository.
#[derive(Debug, Default)]
pub struct FixtureTagRepository {
    tags: Mutex<Vec<Tag>>,
}

impl FixtureTagRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<Tag>>, TagRepositoryError> {
        self.tags
            .lock()
            .map_err(|_| TagRepositoryError::query("fixture tag store poisoned"))
    }

    fn ensure_unique(
        tags: &[Tag],
        name: &ResourceName,
        except: Option<&TagId>,
    ) -> Result<(), TagRepositoryError> {
        let clash = tags
            .iter()
            .any(|tag| tag.name == name.as_ref() && Some(&tag.id) != except);
        if clash {
            return Err(TagRepositoryError::conflict(name.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for FixtureTagRepository {
    async fn create(&self, name: &ResourceName) -> Result<Tag, TagRepositoryError> {
        let mut tags = self.lock()?;
        Self::ensure_unique(&tags, name, None)?;
        let now = Utc::now();
        let tag = Tag {
            id: TagId::random(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn list(
        &self,
        order: TagOrder,
        window: PageWindow,
    ) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut tags = self.lock()?.clone();
        tags.sort_by(|left, right| order.compare(left, right));
        Ok(tags
            .into_iter()
            .skip(window.offset_usize())
            .take(window.limit_usize())
            .collect())
    }

    async fn count(&self) -> Result<u64, TagRepositoryError> {
        Ok(self.lock()?.len() as u64)
    }

    async fn search_by_name(
        &self,
        query: &NameQuery,
        window: PageWindow,
    ) -> Result<Vec<Tag>, TagRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|tag| query.matches_listing(&tag.name))
            .skip(window.offset_usize())
            .take(window.limit_usize())
            .cloned()
            .collect())
    }

    async fn count_by_name(&self, query: &NameQuery) -> Result<u64, TagRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|tag| query.matches_count(&tag.name))
            .count() as u64)
    }

    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagRepositoryError> {
        Ok(self.lock()?.iter().find(|tag| tag.id == *id).cloned())
    }

    async fn rename(
        &self,
        id: &TagId,
        name: &ResourceName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut tags = self.lock()?;
        Self::ensure_unique(&tags, name, Some(id))?;
        let Some(tag) = tags.iter_mut().find(|tag| tag.id == *id) else {
            return Ok(None);
        };
        tag.name = name.to_string();
        tag.updated_at = Utc::now();
        Ok(Some(tag.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(raw: &str) -> ResourceName {
        ResourceName::new(raw).expect("valid name")
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_names_conflict() {
        let repo = FixtureTagRepository::default();
        repo.create(&name("rust")).await.expect("first create");

        let err = repo.create(&name("rust")).await.expect_err("duplicate");
        assert_eq!(err, TagRepositoryError::conflict("rust"));
    }

    #[rstest]
    #[tokio::test]
    async fn renaming_to_own_name_is_allowed() {
        let repo = FixtureTagRepository::default();
        let tag = repo.create(&name("rust")).await.expect("create");

        let renamed = repo.rename(&tag.id, &name("rust")).await.expect("rename");
        assert_eq!(renamed.map(|t| t.name), Some("rust".to_owned()));
    }
}
