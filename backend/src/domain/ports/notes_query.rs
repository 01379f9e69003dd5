//! Driving port for the note feed.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use crate::domain::{ContentCategory, Error, Note, SortKey, UserId};

/// Parameters of one feed request, already parsed from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFeedRequest {
    pub viewer: Option<UserId>,
    pub category: ContentCategory,
    pub order: SortKey,
    pub page: PageRequest,
}

/// Domain use-case port for browsing notes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotesQuery: Send + Sync {
    /// Return one page of the feed with order metadata attached.
    async fn feed(&self, request: NoteFeedRequest) -> Result<Paginated<Note>, Error>;
}
