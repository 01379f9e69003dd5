//! Driving ports for study use-cases.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{Error, NameQuery, Study, StudyChanges, StudyDraft, StudyId, StudyOrder};

/// Read-side study use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudiesQuery: Send + Sync {
    /// One page of studies with order metadata attached.
    async fn list(&self, order: StudyOrder, page: PageRequest) -> Result<Paginated<Study>, Error>;

    /// One page of studies matching a name needle.
    async fn search(
        &self,
        query: NameQuery,
        page: PageRequest,
    ) -> Result<Paginated<Study>, Error>;

    /// A single study; `not_found` when missing.
    async fn get(&self, id: StudyId) -> Result<Study, Error>;
}

/// Write-side study use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudiesCommand: Send + Sync {
    /// Create a study.
    async fn create(&self, draft: StudyDraft) -> Result<Study, Error>;

    /// Apply a partial update; `not_found` when missing.
    async fn update(&self, id: StudyId, changes: StudyChanges) -> Result<Study, Error>;
}
