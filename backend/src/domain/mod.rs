//! Domain primitives, resolvers, services and ports.
//!
//! Purpose: define the strongly typed note, study, tag and user model used
//! by the HTTP and persistence adapters, the pure filter/order resolvers for
//! the note feed, and the services implementing the driving ports.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic error payload.
//! - ContentCategory, NotePredicate, resolve_filter: visibility rules.
//! - SortKey, SortExpression, resolve_order: feed ordering.
//! - Study, Tag, User and their change sets.
//! - NoteFeedService, StudyService, TagService, UserService.

pub mod error;
pub mod ids;
pub mod name_search;
pub mod note;
pub mod note_feed_service;
pub mod note_filter;
pub mod note_order;
pub mod ordering;
pub mod ports;
pub mod study;
pub mod study_service;
pub mod tag;
pub mod tag_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::ids::{NoteId, StudyId, TagId};
pub use self::name_search::{NAME_MAX, NameError, NameQuery, ResourceName};
pub use self::note::Note;
pub use self::note_feed_service::NoteFeedService;
pub use self::note_filter::{
    ContentCategory, InteractionFlag, NoteFacts, NotePredicate, UnknownCategory, resolve_filter,
};
pub use self::note_order::{SortExpression, SortField, SortKey, resolve_order};
pub use self::ordering::{OrderKey, SortDirection};
pub use self::study::{Study, StudyChanges, StudyDraft, StudyOrder};
pub use self::study_service::StudyService;
pub use self::tag::{Tag, TagOrder};
pub use self::tag_service::TagService;
pub use self::trace_id::TraceId;
pub use self::user::{
    AccountChanges, Email, FollowOutcome, ProfileChanges, Role, USERNAME_MAX, USERNAME_MIN, User,
    UserId, UserProfile, UserValidationError, Username,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use noteshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
