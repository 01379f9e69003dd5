//! Port abstraction for note feed persistence and an in-memory fixture.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::PageWindow;

use crate::domain::{
    InteractionFlag, Note, NoteFacts, NoteId, NotePredicate, SortExpression, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by note repository adapters.
    pub enum NoteRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "note repository connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } => "note repository query failed: {message}",
    }
}

/// Read access to notes filtered by a [`NotePredicate`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Return the window of notes matching `predicate`, sorted by `order`.
    async fn list(
        &self,
        predicate: &NotePredicate,
        order: SortExpression,
        window: PageWindow,
    ) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Count every note matching `predicate`.
    async fn count(&self, predicate: &NotePredicate) -> Result<u64, NoteRepositoryError>;
}

#[derive(Debug, Default)]
struct NoteStore {
    notes: Vec<Note>,
    grants: HashSet<(NoteId, UserId)>,
    interactions: HashMap<(NoteId, UserId), HashSet<InteractionFlag>>,
}

struct StoredNote<'a> {
    note: &'a Note,
    store: &'a NoteStore,
}

impl NoteFacts for StoredNote<'_> {
    fn is_private(&self) -> bool {
        self.note.is_private
    }

    fn owner_id(&self) -> &UserId {
        &self.note.user_id
    }

    fn is_granted_to(&self, user: &UserId) -> bool {
        self.store.grants.contains(&(self.note.id, user.clone()))
    }

    fn has_interaction(&self, user: &UserId, flag: InteractionFlag) -> bool {
        self.store
            .interactions
            .get(&(self.note.id, user.clone()))
            .is_some_and(|flags| flags.contains(&flag))
    }
}

impl NoteStore {
    fn matching<'a>(
        &'a self,
        predicate: &'a NotePredicate,
    ) -> impl Iterator<Item = &'a Note> + 'a {
        self.notes.iter().filter(move |note| {
            predicate.matches(&StoredNote {
                note: *note,
                store: self,
            })
        })
    }
}

/// In-memory note repository used when no database is configured and in
/// tests.
#[derive(Debug, Default)]
pub struct FixtureNoteRepository {
    store: Mutex<NoteStore>,
}

impl FixtureNoteRepository {
    fn lock(&self) -> Result<MutexGuard<'_, NoteStore>, NoteRepositoryError> {
        self.store
            .lock()
            .map_err(|_| NoteRepositoryError::query("fixture note store poisoned"))
    }

    /// Add a note to the store.
    pub fn insert(&self, note: Note) -> Result<(), NoteRepositoryError> {
        self.lock()?.notes.push(note);
        Ok(())
    }

    /// Grant `user` explicit access to a note.
    pub fn grant(&self, note: NoteId, user: UserId) -> Result<(), NoteRepositoryError> {
        self.lock()?.grants.insert((note, user));
        Ok(())
    }

    /// Record an interaction flag set by `user` on a note.
    pub fn mark(
        &self,
        note: NoteId,
        user: UserId,
        flag: InteractionFlag,
    ) -> Result<(), NoteRepositoryError> {
        self.lock()?
            .interactions
            .entry((note, user))
            .or_default()
            .insert(flag);
        Ok(())
    }
}

#[async_trait]
impl NoteRepository for FixtureNoteRepository {
    async fn list(
        &self,
        predicate: &NotePredicate,
        order: SortExpression,
        window: PageWindow,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let store = self.lock()?;
        let mut notes: Vec<Note> = store.matching(predicate).cloned().collect();
        notes.sort_by(|left, right| order.compare(left, right));
        Ok(notes
            .into_iter()
            .skip(window.offset_usize())
            .take(window.limit_usize())
            .collect())
    }

    async fn count(&self, predicate: &NotePredicate) -> Result<u64, NoteRepositoryError> {
        let store = self.lock()?;
        Ok(store.matching(predicate).count() as u64)
    }
}
