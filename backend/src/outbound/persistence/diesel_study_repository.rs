//! PostgreSQL-backed [`StudyRepository`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::AsSelect;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::PageWindow;
use uuid::Uuid;

use crate::domain::ports::{StudyRepository, StudyRepositoryError, StudyUpdate};
use crate::domain::{
    NameQuery, SortDirection, Study, StudyChanges, StudyDraft, StudyId, StudyOrder,
};

use super::diesel_note_repository::non_negative;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewStudyRow, StudyRow, StudyUpdateRow};
use super::pool::DbPool;
use super::schema::studies;

/// Diesel-backed study storage.
#[derive(Clone)]
pub struct DieselStudyRepository {
    pool: DbPool,
}

impl DieselStudyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<StudyRow> for Study {
    fn from(row: StudyRow) -> Self {
        Self {
            id: StudyId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            image: row.image,
            note_count: non_negative(row.note_count),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn ordered(
    query: studies::BoxedQuery<'static, diesel::pg::Pg, AsSelect<StudyRow, diesel::pg::Pg>>,
    order: StudyOrder,
) -> studies::BoxedQuery<'static, diesel::pg::Pg, AsSelect<StudyRow, diesel::pg::Pg>> {
    let query = match (order, order.direction()) {
        (StudyOrder::New | StudyOrder::Old, SortDirection::Desc) => {
            query.order(studies::created_at.desc())
        }
        (StudyOrder::New | StudyOrder::Old, SortDirection::Asc) => {
            query.order(studies::created_at.asc())
        }
        (StudyOrder::MostNotes | StudyOrder::LeastNotes, SortDirection::Desc) => {
            query.order(studies::note_count.desc())
        }
        (StudyOrder::MostNotes | StudyOrder::LeastNotes, SortDirection::Asc) => {
            query.order(studies::note_count.asc())
        }
    };
    query.then_order_by(studies::id.asc())
}

#[async_trait]
impl StudyRepository for DieselStudyRepository {
    async fn create(&self, draft: &StudyDraft) -> Result<Study, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewStudyRow {
            id: Uuid::new_v4(),
            name: draft.name.as_ref(),
            description: &draft.description,
            image: draft.image.as_deref(),
        };
        let stored: StudyRow = diesel::insert_into(studies::table)
            .values(&row)
            .returning(StudyRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn list(
        &self,
        order: StudyOrder,
        window: PageWindow,
    ) -> Result<Vec<Study>, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = studies::table.select(StudyRow::as_select()).into_boxed();
        let rows: Vec<StudyRow> = ordered(query, order)
            .offset(window.offset_i64())
            .limit(window.limit_i64())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Study::from).collect())
    }

    async fn count(&self) -> Result<u64, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = studies::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn search_by_name(
        &self,
        query: &NameQuery,
        window: PageWindow,
    ) -> Result<Vec<Study>, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<StudyRow> = studies::table
            .filter(studies::name.ilike(query.like_pattern()))
            .select(StudyRow::as_select())
            .order((studies::created_at.desc(), studies::id.asc()))
            .offset(window.offset_i64())
            .limit(window.limit_i64())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Study::from).collect())
    }

    async fn count_by_name(&self, query: &NameQuery) -> Result<u64, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = studies::table
            .filter(studies::name.like(query.like_pattern()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_by_id(&self, id: &StudyId) -> Result<Option<Study>, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<StudyRow> = studies::table
            .find(*id.as_uuid())
            .select(StudyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Study::from))
    }

    async fn update(
        &self,
        id: &StudyId,
        changes: &StudyChanges,
    ) -> Result<Option<StudyUpdate>, StudyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = *id.as_uuid();
        let changeset = StudyUpdateRow {
            name: changes.name.as_ref().map(AsRef::as_ref),
            description: changes.description.as_deref(),
            image: changes.image.as_deref(),
            updated_at: Utc::now(),
        };
        let outcome = conn
            .transaction(|conn| {
                async move {
                    let previous: Option<StudyRow> = studies::table
                        .find(key)
                        .select(StudyRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(previous) = previous else {
                        return Ok(None);
                    };
                    let updated: StudyRow = diesel::update(studies::table.find(key))
                        .set(&changeset)
                        .returning(StudyRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok::<_, diesel::result::Error>(Some((previous.image, updated)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(outcome.map(|(previous_image, row)| {
            let replaced_image = previous_image.filter(|old| row.image.as_ref() != Some(old));
            StudyUpdate {
                study: row.into(),
                replaced_image,
            }
        }))
    }
}
