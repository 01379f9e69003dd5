//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound persistence
//! adapters and by the in-memory fixtures defined alongside them. Driving
//! ports (`*Query`, `*Command`) are implemented by the domain services and
//! consumed by inbound HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod note_repository;
mod notes_query;
mod studies;
mod study_repository;
mod tag_repository;
mod tags;
mod user_repository;
mod users;

#[cfg(test)]
pub use note_repository::MockNoteRepository;
pub use note_repository::{FixtureNoteRepository, NoteRepository, NoteRepositoryError};
#[cfg(test)]
pub use notes_query::MockNotesQuery;
pub use notes_query::{NoteFeedRequest, NotesQuery};
#[cfg(test)]
pub use studies::{MockStudiesCommand, MockStudiesQuery};
pub use studies::{StudiesCommand, StudiesQuery};
#[cfg(test)]
pub use study_repository::MockStudyRepository;
pub use study_repository::{
    FixtureStudyRepository, StudyRepository, StudyRepositoryError, StudyUpdate,
};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{FixtureTagRepository, TagRepository, TagRepositoryError};
#[cfg(test)]
pub use tags::{MockTagsCommand, MockTagsQuery};
pub use tags::{TagsCommand, TagsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users::{MockUsersCommand, MockUsersQuery};
pub use users::{Availability, AvailabilityRequest, UsersCommand, UsersQuery};
