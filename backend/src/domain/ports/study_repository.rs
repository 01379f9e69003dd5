//! Port abstraction for study persistence and an in-memory fixture.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageWindow;

use crate::domain::{NameQuery, Study, StudyChanges, StudyDraft, StudyId, StudyOrder};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by study repository adapters.
    pub enum StudyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "study repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "study repository query failed: {message}",
        /// A unique constraint rejected the write.
        Conflict { message: String } => "study already exists: {message}",
    }
}

/// Result of a successful study update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyUpdate {
    pub study: Study,
    /// Image URL superseded by the update, if any.
    pub replaced_image: Option<String>,
}

/// Persistence for studies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudyRepository: Send + Sync {
    /// Insert a new study.
    async fn create(&self, draft: &StudyDraft) -> Result<Study, StudyRepositoryError>;

    /// Return a window of studies sorted by `order`.
    async fn list(
        &self,
        order: StudyOrder,
        window: PageWindow,
    ) -> Result<Vec<Study>, StudyRepositoryError>;

    /// Count all studies.
    async fn count(&self) -> Result<u64, StudyRepositoryError>;

    /// Return a window of studies whose name contains the needle, ignoring
    /// case.
    async fn search_by_name(
        &self,
        query: &NameQuery,
        window: PageWindow,
    ) -> Result<Vec<Study>, StudyRepositoryError>;

    /// Count studies whose name contains the needle, respecting case.
    async fn count_by_name(&self, query: &NameQuery) -> Result<u64, StudyRepositoryError>;

    /// Fetch a study by identifier.
    async fn find_by_id(&self, id: &StudyId) -> Result<Option<Study>, StudyRepositoryError>;

    /// Apply a partial update; `None` when the study does not exist.
    async fn update(
        &self,
        id: &StudyId,
        changes: &StudyChanges,
    ) -> Result<Option<StudyUpdate>, StudyRepositoryError>;
}

/// In-memory study repository.
#[derive(Debug, Default)]
pub struct FixtureStudyRepository {
    studies: Mutex<Vec<Study>>,
}

impl FixtureStudyRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Vec<Study>>, StudyRepositoryError> {
        self.studies
            .lock()
            .map_err(|_| StudyRepositoryError::query("fixture study store poisoned"))
    }

    /// Add a fully formed study, e.g. with a preset note count.
    pub fn insert(&self, study: Study) -> Result<(), StudyRepositoryError> {
        self.lock()?.push(study);
        Ok(())
    }
}

#[async_trait]
impl StudyRepository for FixtureStudyRepository {
    async fn create(&self, draft: &StudyDraft) -> Result<Study, StudyRepositoryError> {
        let now = Utc::now();
        let study = Study {
            id: StudyId::random(),
            name: draft.name.to_string(),
            description: draft.description.clone(),
            image: draft.image.clone(),
            note_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.lock()?.push(study.clone());
        Ok(study)
    }

    async fn list(
        &self,
        order: StudyOrder,
        window: PageWindow,
    ) -> Result<Vec<Study>, StudyRepositoryError> {
        let mut studies = self.lock()?.clone();
        studies.sort_by(|left, right| order.compare(left, right));
        Ok(studies
            .into_iter()
            .skip(window.offset_usize())
            .take(window.limit_usize())
            .collect())
    }

    async fn count(&self) -> Result<u64, StudyRepositoryError> {
        Ok(self.lock()?.len() as u64)
    }

    async fn search_by_name(
        &self,
        query: &NameQuery,
        window: PageWindow,
    ) -> Result<Vec<Study>, StudyRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|study| query.matches_listing(&study.name))
            .skip(window.offset_usize())
            .take(window.limit_usize())
            .cloned()
            .collect())
    }

    async fn count_by_name(&self, query: &NameQuery) -> Result<u64, StudyRepositoryError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|study| query.matches_count(&study.name))
            .count() as u64)
    }

    async fn find_by_id(&self, id: &StudyId) -> Result<Option<Study>, StudyRepositoryError> {
        Ok(self.lock()?.iter().find(|study| study.id == *id).cloned())
    }

    async fn update(
        &self,
        id: &StudyId,
        changes: &StudyChanges,
    ) -> Result<Option<StudyUpdate>, StudyRepositoryError> {
        let mut studies = self.lock()?;
        let Some(study) = studies.iter_mut().find(|study| study.id == *id) else {
            return Ok(None);
        };
        let replaced_image = changes.apply_to(study);
        study.updated_at = Utc::now();
        Ok(Some(StudyUpdate {
            study: study.clone(),
            replaced_image,
        }))
    }
}
