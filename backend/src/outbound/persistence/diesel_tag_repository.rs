//! PostgreSQL-backed [`TagRepository`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageWindow;
use uuid::Uuid;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{NameQuery, ResourceName, SortDirection, Tag, TagId, TagOrder};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewTagRow, TagRow};
use super::pool::DbPool;
use super::schema::tags;

/// Diesel-backed tag storage. Name uniqueness is enforced by the
/// `tags_name_key` constraint.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: TagId::from_uuid(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn create(&self, name: &ResourceName) -> Result<Tag, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTagRow {
            id: Uuid::new_v4(),
            name: name.as_ref(),
        };
        let stored: TagRow = diesel::insert_into(tags::table)
            .values(&row)
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(stored.into())
    }

    async fn list(
        &self,
        order: TagOrder,
        window: PageWindow,
    ) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = tags::table.select(TagRow::as_select()).into_boxed();
        let query = match order.direction() {
            SortDirection::Desc => query.order(tags::created_at.desc()),
            SortDirection::Asc => query.order(tags::created_at.asc()),
        };
        let rows: Vec<TagRow> = query
            .then_order_by(tags::id.asc())
            .offset(window.offset_i64())
            .limit(window.limit_i64())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn count(&self) -> Result<u64, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = tags::table
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
    ) -> Result<Vec<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::name.ilike(query.like_pattern()))
            .select(TagRow::as_select())
            .order((tags::created_at.desc(), tags::id.asc()))
            .offset(window.offset_i64())
            .limit(window.limit_i64())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn count_by_name(&self, query: &NameQuery) -> Result<u64, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = tags::table
            .filter(tags::name.like(query.like_pattern()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_by_id(&self, id: &TagId) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(*id.as_uuid())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Tag::from))
    }

    async fn rename(
        &self,
        id: &TagId,
        name: &ResourceName,
    ) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = diesel::update(tags::table.find(*id.as_uuid()))
            .set((tags::name.eq(name.as_ref()), tags::updated_at.eq(Utc::now())))
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Tag::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;
    use diesel::pg::Pg;
    use rstest::rstest;

    #[rstest]
    fn listing_search_ignores_case() {
        let needle = NameQuery::new(Some("Rust"));
        let query = tags::table
            .select(tags::id)
            .filter(tags::name.ilike(needle.like_pattern()));
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains("ILIKE"));
        assert!(sql.contains("%Rust%"));
    }

    #[rstest]
    fn counting_search_respects_case() {
        let needle = NameQuery::new(Some("Rust"));
        let query = tags::table
            .filter(tags::name.like(needle.like_pattern()))
            .count();
        let sql = debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains(" LIKE "));
        assert!(!sql.contains("ILIKE"));
    }
}
