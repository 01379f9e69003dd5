//! PostgreSQL-backed [`NoteRepository`] translating [`NotePredicate`] trees
//! into SQL.
//!
//! Grants and interaction flags are matched with `IN (subselect)` so a note
//! appears once no matter how many rows point at it.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::RunQueryDsl;
use pagination::PageWindow;

use crate::domain::ports::{NoteRepository, NoteRepositoryError};
use crate::domain::{
    InteractionFlag, Note, NoteId, NotePredicate, SortDirection, SortExpression, SortField,
    StudyId, UserId,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::NoteRow;
use super::pool::DbPool;
use super::schema::{note_interactions, note_permissions, notes};

type NoteFilter = Box<dyn BoxableExpression<notes::table, Pg, SqlType = Bool>>;

/// Diesel-backed note feed reads.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: NoteId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            study_id: row.study_id.map(StudyId::from_uuid),
            title: row.title,
            description: row.description,
            is_private: row.is_private,
            upvoted_count: non_negative(row.upvoted_count),
            downvoted_count: non_negative(row.downvoted_count),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn literal(value: bool) -> NoteFilter {
    Box::new(sql::<Bool>(if value { "TRUE" } else { "FALSE" }))
}

/// Translate a predicate tree into a boxed `WHERE` expression over `notes`.
fn to_sql(predicate: &NotePredicate) -> NoteFilter {
    match predicate {
        NotePredicate::Never => literal(false),
        NotePredicate::IsPrivate(flag) => Box::new(notes::is_private.eq(*flag)),
        NotePredicate::OwnedBy(user) => Box::new(notes::user_id.eq(*user.as_uuid())),
        NotePredicate::PermissionGrantedTo(user) => Box::new(
            notes::id.eq_any(
                note_permissions::table
                    .filter(note_permissions::user_id.eq(*user.as_uuid()))
                    .select(note_permissions::note_id),
            ),
        ),
        NotePredicate::Interaction { user, flag } => {
            let for_user = note_interactions::table
                .filter(note_interactions::user_id.eq(*user.as_uuid()));
            match flag {
                InteractionFlag::Favorited => Box::new(
                    notes::id.eq_any(
                        for_user
                            .filter(note_interactions::is_favorited.eq(true))
                            .select(note_interactions::note_id),
                    ),
                ),
                InteractionFlag::Saved => Box::new(
                    notes::id.eq_any(
                        for_user
                            .filter(note_interactions::is_saved.eq(true))
                            .select(note_interactions::note_id),
                    ),
                ),
            }
        }
        NotePredicate::All(children) => children
            .iter()
            .map(to_sql)
            .reduce(|acc, next| Box::new(acc.and(next)))
            .unwrap_or_else(|| literal(true)),
        NotePredicate::Any(children) => children
            .iter()
            .map(to_sql)
            .reduce(|acc, next| Box::new(acc.or(next)))
            .unwrap_or_else(|| literal(false)),
    }
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn list(
        &self,
        predicate: &NotePredicate,
        order: SortExpression,
        window: PageWindow,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = notes::table
            .filter(to_sql(predicate))
            .select(NoteRow::as_select())
            .into_boxed();
        let query = match (order.field, order.direction) {
            (SortField::CreatedAt, SortDirection::Asc) => query.order(notes::created_at.asc()),
            (SortField::CreatedAt, SortDirection::Desc) => query.order(notes::created_at.desc()),
            (SortField::UpvotedCount, SortDirection::Asc) => {
                query.order(notes::upvoted_count.asc())
            }
            (SortField::UpvotedCount, SortDirection::Desc) => {
                query.order(notes::upvoted_count.desc())
            }
            (SortField::DownvotedCount, SortDirection::Asc) => {
                query.order(notes::downvoted_count.asc())
            }
            (SortField::DownvotedCount, SortDirection::Desc) => {
                query.order(notes::downvoted_count.desc())
            }
        };
        let rows: Vec<NoteRow> = query
            .then_order_by(notes::id.asc())
            .offset(window.offset_i64())
            .limit(window.limit_i64())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn count(&self, predicate: &NotePredicate) -> Result<u64, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = notes::table
            .filter(to_sql(predicate))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }
}
