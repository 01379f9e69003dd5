//! Study service implementing [`StudiesQuery`] and [`StudiesCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageRequest, Paginated, paginate};
use tracing::info;

use crate::domain::ports::{StudiesCommand, StudiesQuery, StudyRepository, StudyRepositoryError};
use crate::domain::{
    Error, NameQuery, OrderKey, Study, StudyChanges, StudyDraft, StudyId, StudyOrder,
};

/// Study use-cases over a [`StudyRepository`].
#[derive(Clone)]
pub struct StudyService<R> {
    studies: Arc<R>,
}

impl<R> StudyService<R> {
    /// Create a service over the given repository.
    pub fn new(studies: Arc<R>) -> Self {
        Self { studies }
    }
}

fn map_study_error(error: StudyRepositoryError) -> Error {
    match error {
        StudyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("study repository unavailable: {message}"))
        }
        StudyRepositoryError::Query { message } => {
            Error::internal(format!("study repository error: {message}"))
        }
        StudyRepositoryError::Conflict { message } => {
            Error::conflict(format!("study already exists: {message}"))
        }
    }
}

fn study_not_found(id: StudyId) -> Error {
    Error::not_found(format!("study {id} not found"))
}

#[async_trait]
impl<R> StudiesQuery for StudyService<R>
where
    R: StudyRepository,
{
    async fn list(&self, order: StudyOrder, page: PageRequest) -> Result<Paginated<Study>, Error> {
        let total = self.studies.count().await.map_err(map_study_error)?;
        let items = self
            .studies
            .list(order, page.window())
            .await
            .map_err(map_study_error)?;
        Ok(paginate(
            items,
            page.page(),
            page.limit(),
            total,
            Some(order.metadata()),
        ))
    }

    async fn search(
        &self,
        query: NameQuery,
        page: PageRequest,
    ) -> Result<Paginated<Study>, Error> {
        let total = self
            .studies
            .count_by_name(&query)
            .await
            .map_err(map_study_error)?;
        let items = self
            .studies
            .search_by_name(&query, page.window())
            .await
            .map_err(map_study_error)?;
        Ok(paginate(items, page.page(), page.limit(), total, None))
    }

    async fn get(&self, id: StudyId) -> Result<Study, Error> {
        self.studies
            .find_by_id(&id)
            .await
            .map_err(map_study_error)?
            .ok_or_else(|| study_not_found(id))
    }
}

#[async_trait]
impl<R> StudiesCommand for StudyService<R>
where
    R: StudyRepository,
{
    async fn create(&self, draft: StudyDraft) -> Result<Study, Error> {
        let study = self.studies.create(&draft).await.map_err(map_study_error)?;
        info!(study_id = %study.id, "study created");
        Ok(study)
    }

    async fn update(&self, id: StudyId, changes: StudyChanges) -> Result<Study, Error> {
        let update = self
            .studies
            .update(&id, &changes)
            .await
            .map_err(map_study_error)?
            .ok_or_else(|| study_not_found(id))?;
        if let Some(previous) = &update.replaced_image {
            info!(study_id = %id, previous_image = %previous, "study image replaced");
        }
        Ok(update.study)
    }
}
