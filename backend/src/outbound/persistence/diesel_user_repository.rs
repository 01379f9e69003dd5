//! PostgreSQL-backed [`UserRepository`].
//!
//! Follow edges live in `follows`; the counters on `users` are adjusted in
//! the same transaction as the edge so they never drift.

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use pagination::PageWindow;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    AccountChanges, Email, FollowOutcome, ProfileChanges, Role, User, UserId, UserProfile,
    Username,
};

use super::diesel_note_repository::non_negative;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AccountUpdate, ProfileUpdate, UserRow};
use super::pool::DbPool;
use super::schema::{follows, users};

/// Diesel-backed user storage.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TryFrom<UserRow> for User {
    type Error = UserPersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, error: &dyn std::fmt::Display| {
            warn!(user_id = %row.id, field, %error, "stored user row failed validation");
            UserPersistenceError::query(format!("stored user has invalid {field}"))
        };
        let username = Username::new(row.username.clone()).map_err(|e| corrupt("username", &e))?;
        let email = Email::new(&row.email).map_err(|e| corrupt("email", &e))?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| corrupt("role", &e))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            username,
            email,
            role,
            profile: UserProfile {
                full_name: row.full_name,
                about: row.about,
                profile_image: row.profile_image,
            },
            follower_count: non_negative(row.follower_count),
            following_count: non_negative(row.following_count),
            created_at: row.created_at,
        })
    }
}

fn to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(User::try_from).collect()
}

/// Insert statement for a follow edge. An edge written by a concurrent
/// toggle is left in place.
macro_rules! insert_follow {
    ($follower:expr, $followee:expr) => {
        diesel::insert_into(follows::table)
            .values((
                follows::follower_id.eq($follower),
                follows::followee_id.eq($followee),
                follows::created_at.eq(Utc::now()),
            ))
            .on_conflict_do_nothing()
    };
}

/// Outcome and counter delta for a toggle that removed `removed` edges and
/// inserted `inserted` edges. No insert after no removal means another
/// request created the edge first and already counted it.
fn follow_transition(removed: usize, inserted: usize) -> (FollowOutcome, i32) {
    match (removed, inserted) {
        (0, 0) => (FollowOutcome::Followed, 0),
        (0, _) => (FollowOutcome::Followed, 1),
        _ => (FollowOutcome::Unfollowed, -1),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn list(&self, window: PageWindow) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order((users::created_at.desc(), users::id.asc()))
            .offset(window.offset_i64())
            .limit(window.limit_i64())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_users(rows)
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn update_account(
        &self,
        id: &UserId,
        changes: &AccountChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = AccountUpdate {
            username: changes.username.as_ref().map(AsRef::as_ref),
            email: changes.email.as_ref().map(AsRef::as_ref),
            updated_at: Utc::now(),
        };
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ProfileUpdate {
            full_name: changes.full_name.as_deref(),
            about: changes.about.as_deref(),
            profile_image: changes.profile_image.as_deref(),
            updated_at: Utc::now(),
        };
        let row: Option<UserRow> = diesel::update(users::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(User::try_from).transpose()
    }

    async fn username_taken(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            users::table.filter(users::username.eq(username.as_ref())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn email_taken(&self, email: &Email) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(users::table.filter(users::email.eq(email.as_ref()))))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn toggle_follow(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<FollowOutcome, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (follower, followee) = (*follower.as_uuid(), *followee.as_uuid());
        conn.transaction(|conn| {
            async move {
                let removed = diesel::delete(
                    follows::table
                        .filter(follows::follower_id.eq(follower))
                        .filter(follows::followee_id.eq(followee)),
                )
                .execute(conn)
                .await?;

                let inserted = if removed > 0 {
                    0
                } else {
                    insert_follow!(follower, followee).execute(conn).await?
                };
                let (outcome, delta) = follow_transition(removed, inserted);
                if delta == 0 {
                    return Ok::<_, diesel::result::Error>(outcome);
                }

                diesel::update(users::table.find(follower))
                    .set(users::following_count.eq(users::following_count + delta))
                    .execute(conn)
                    .await?;
                diesel::update(users::table.find(followee))
                    .set(users::follower_count.eq(users::follower_count + delta))
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(outcome)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(role: &str, username: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            email: "ada@example.com".to_owned(),
            role: role.to_owned(),
            full_name: Some("Ada Lovelace".to_owned()),
            about: None,
            profile_image: None,
            follower_count: 3,
            following_count: -1,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_convert() {
        let user = User::try_from(row("ADMIN", "ada_l")).expect("valid row");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.username.as_ref(), "ada_l");
        assert_eq!(user.profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.follower_count, 3);
        assert_eq!(user.following_count, 0);
    }

    #[rstest]
    #[case("OWNER", "ada_l", "role")]
    #[case("USER", "a!", "username")]
    fn invalid_rows_are_query_errors(
        #[case] role: &str,
        #[case] username: &str,
        #[case] field: &str,
    ) {
        let err = User::try_from(row(role, username)).expect_err("invalid row");
        assert_eq!(
            err,
            UserPersistenceError::query(format!("stored user has invalid {field}"))
        );
    }

    #[rstest]
    #[case(0, 1, FollowOutcome::Followed, 1)]
    #[case(0, 0, FollowOutcome::Followed, 0)]
    #[case(1, 0, FollowOutcome::Unfollowed, -1)]
    fn follow_transition_counts_each_edge_once(
        #[case] removed: usize,
        #[case] inserted: usize,
        #[case] outcome: FollowOutcome,
        #[case] delta: i32,
    ) {
        assert_eq!(follow_transition(removed, inserted), (outcome, delta));
    }

    #[rstest]
    fn concurrent_follow_insert_does_not_conflict() {
        let sql = diesel::debug_query::<diesel::pg::Pg, _>(&insert_follow!(
            Uuid::new_v4(),
            Uuid::new_v4()
        ))
        .to_string();
        assert!(sql.contains("ON CONFLICT DO NOTHING"), "{sql}");
    }
}
