//! Port abstraction for user persistence adapters and their errors.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{
    AccountChanges, Email, FollowOutcome, ProfileChanges, User, UserId, Username,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique username or email constraint rejected the write.
        Conflict { message: String } => "user already exists: {message}",
    }
}

/// Persistence for users, their profiles and follow edges.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return a window of users, newest first.
    async fn list(&self, window: PageWindow) -> Result<Vec<User>, UserPersistenceError>;

    /// Count all users.
    async fn count(&self) -> Result<u64, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Change username and/or email; `None` when the user does not exist.
    async fn update_account(
        &self,
        id: &UserId,
        changes: &AccountChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Change profile fields; `None` when the user does not exist.
    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Whether any account already uses `username`.
    async fn username_taken(&self, username: &Username) -> Result<bool, UserPersistenceError>;

    /// Whether any account already uses `email`.
    async fn email_taken(&self, email: &Email) -> Result<bool, UserPersistenceError>;

    /// Follow `followee` if not yet followed, otherwise unfollow.
    async fn toggle_follow(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<FollowOutcome, UserPersistenceError>;
}

#[derive(Debug, Default)]
struct UserStore {
    users: Vec<User>,
    follows: HashSet<(UserId, UserId)>,
}

impl UserStore {
    fn position(&self, id: &UserId) -> Option<usize> {
        self.users.iter().position(|user| user.id == *id)
    }

    fn adjust_counts(&mut self, follower: &UserId, followee: &UserId, followed: bool) {
        for user in &mut self.users {
            if user.id == *follower {
                user.following_count = shift(user.following_count, followed);
            }
            if user.id == *followee {
                user.follower_count = shift(user.follower_count, followed);
            }
        }
    }
}

fn shift(count: u32, up: bool) -> u32 {
    if up {
        count.saturating_add(1)
    } else {
        count.saturating_sub(1)
    }
}

/// In-memory user repository.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    store: Mutex<UserStore>,
}

impl FixtureUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, UserStore>, UserPersistenceError> {
        self.store
            .lock()
            .map_err(|_| UserPersistenceError::query("fixture user store poisoned"))
    }

    /// Add a user to the store.
    pub fn insert(&self, user: User) -> Result<(), UserPersistenceError> {
        self.lock()?.users.push(user);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn list(&self, window: PageWindow) -> Result<Vec<User>, UserPersistenceError> {
        let mut users = self.lock()?.users.clone();
        users.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| left.id.as_uuid().cmp(right.id.as_uuid()))
        });
        Ok(users
            .into_iter()
            .skip(window.offset_usize())
            .take(window.limit_usize())
            .collect())
    }

    async fn count(&self) -> Result<u64, UserPersistenceError> {
        Ok(self.lock()?.users.len() as u64)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.users.iter().find(|user| user.id == *id).cloned())
    }

    async fn update_account(
        &self,
        id: &UserId,
        changes: &AccountChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut store = self.lock()?;
        let clash = store.users.iter().find(|user| {
            user.id != *id
                && (changes.username.as_ref() == Some(&user.username)
                    || changes.email.as_ref() == Some(&user.email))
        });
        if let Some(other) = clash {
            return Err(UserPersistenceError::conflict(other.username.to_string()));
        }
        let Some(index) = store.position(id) else {
            return Ok(None);
        };
        let user = &mut store.users[index];
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        Ok(Some(user.clone()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut store = self.lock()?;
        let Some(index) = store.position(id) else {
            return Ok(None);
        };
        let profile = &mut store.users[index].profile;
        if let Some(full_name) = &changes.full_name {
            profile.full_name = Some(full_name.clone());
        }
        if let Some(about) = &changes.about {
            profile.about = Some(about.clone());
        }
        if let Some(image) = &changes.profile_image {
            profile.profile_image = Some(image.clone());
        }
        Ok(Some(store.users[index].clone()))
    }

    async fn username_taken(&self, username: &Username) -> Result<bool, UserPersistenceError> {
        Ok(self
            .lock()?
            .users
            .iter()
            .any(|user| user.username == *username))
    }

    async fn email_taken(&self, email: &Email) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.users.iter().any(|user| user.email == *email))
    }

    async fn toggle_follow(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<FollowOutcome, UserPersistenceError> {
        let mut store = self.lock()?;
        let edge = (follower.clone(), followee.clone());
        let outcome = if store.follows.remove(&edge) {
            FollowOutcome::Unfollowed
        } else {
            store.follows.insert(edge);
            FollowOutcome::Followed
        };
        store.adjust_counts(follower, followee, outcome == FollowOutcome::Followed);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserProfile};
    use chrono::Utc;
    use rstest::rstest;

    fn user(name: &str) -> User {
        User {
            id: UserId::random(),
            username: Username::new(name).expect("valid username"),
            email: Email::new(format!("{name}@example.com")).expect("valid email"),
            role: Role::User,
            profile: UserProfile::default(),
            follower_count: 0,
            following_count: 0,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn toggle_follow_flips_edge_and_counters() {
        let repo = FixtureUserRepository::default();
        let ada = user("ada");
        let grace = user("grace");
        let (ada_id, grace_id) = (ada.id.clone(), grace.id.clone());
        repo.insert(ada).expect("insert");
        repo.insert(grace).expect("insert");

        let first = repo.toggle_follow(&ada_id, &grace_id).await.expect("follow");
        let grace_after = repo.find_by_id(&grace_id).await.expect("find").expect("grace");
        assert_eq!(first, FollowOutcome::Followed);
        assert_eq!(grace_after.follower_count, 1);

        let second = repo
            .toggle_follow(&ada_id, &grace_id)
            .await
            .expect("unfollow");
        let ada_after = repo.find_by_id(&ada_id).await.expect("find").expect("ada");
        assert_eq!(second, FollowOutcome::Unfollowed);
        assert_eq!(ada_after.following_count, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn account_update_rejects_taken_username() {
        let repo = FixtureUserRepository::default();
        let ada = user("ada");
        let ada_id = ada.id.clone();
        repo.insert(ada).expect("insert");
        repo.insert(user("grace")).expect("insert");

        let changes = AccountChanges {
            username: Some(Username::new("grace").expect("valid")),
            email: None,
        };
        let err = repo
            .update_account(&ada_id, &changes)
            .await
            .expect_err("conflict");
        assert!(matches!(err, UserPersistenceError::Conflict { .. }));
    }
}
