//! Note feed service implementing [`NotesQuery`].

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Paginated, paginate};
use tracing::debug;

use crate::domain::ports::{NoteFeedRequest, NoteRepository, NoteRepositoryError, NotesQuery};
use crate::domain::{Error, Note, OrderKey, resolve_filter, resolve_order};

/// Resolves feed requests into repository queries.
#[derive(Clone)]
pub struct NoteFeedService<R> {
    notes: Arc<R>,
}

impl<R> NoteFeedService<R> {
    /// Create a service over the given repository.
    pub fn new(notes: Arc<R>) -> Self {
        Self { notes }
    }
}

pub(crate) fn map_note_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note repository unavailable: {message}"))
        }
        NoteRepositoryError::Query { message } => {
            Error::internal(format!("note repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> NotesQuery for NoteFeedService<R>
where
    R: NoteRepository,
{
    async fn feed(&self, request: NoteFeedRequest) -> Result<Paginated<Note>, Error> {
        let NoteFeedRequest {
            viewer,
            category,
            order,
            page,
        } = request;
        let predicate = resolve_filter(category, viewer.as_ref());
        let metadata = Some(order.metadata());

        if predicate.is_unsatisfiable() {
            debug!(%category, "feed predicate is unsatisfiable; skipping queries");
            return Ok(paginate(Vec::new(), page.page(), page.limit(), 0, metadata));
        }

        let total = self.notes.count(&predicate).await.map_err(map_note_error)?;
        let items = self
            .notes
            .list(&predicate, resolve_order(order), page.window())
            .await
            .map_err(map_note_error)?;
        Ok(paginate(items, page.page(), page.limit(), total, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockNoteRepository;
    use crate::domain::{ContentCategory, ErrorCode, NotePredicate, SortKey, UserId};
    use pagination::PageRequest;
    use rstest::rstest;

    fn request(category: ContentCategory, viewer: Option<UserId>) -> NoteFeedRequest {
        NoteFeedRequest {
            viewer,
            category,
            order: SortKey::Best,
            page: PageRequest::new(2, 10),
        }
    }

    #[rstest]
    #[case(ContentCategory::Saved)]
    #[case(ContentCategory::Private)]
    #[tokio::test]
    async fn anonymous_scoped_feed_skips_repository(#[case] category: ContentCategory) {
        let mut repo = MockNoteRepository::new();
        repo.expect_count().times(0);
        repo.expect_list().times(0);
        let service = NoteFeedService::new(Arc::new(repo));

        let page = service.feed(request(category, None)).await.expect("feed");

        assert!(page.data().is_empty());
        assert_eq!(page.total_page(), 0);
        assert_eq!(page.order().map(|meta| meta.order.as_str()), Some("best"));
    }

    #[rstest]
    #[tokio::test]
    async fn feed_passes_resolved_predicate_and_window() {
        let viewer = UserId::random();
        let expected = NotePredicate::OwnedBy(viewer.clone());
        let count_expected = expected.clone();
        let mut repo = MockNoteRepository::new();
        repo.expect_count()
            .withf(move |predicate| *predicate == count_expected)
            .times(1)
            .return_once(|_| Ok(25));
        repo.expect_list()
            .withf(move |predicate, order, window| {
                *predicate == expected
                    && *order == resolve_order(SortKey::Best)
                    && window.offset() == 10
                    && window.limit() == 10
            })
            .times(1)
            .return_once(|_, _, _| Ok(Vec::new()));
        let service = NoteFeedService::new(Arc::new(repo));

        let page = service
            .feed(request(ContentCategory::OwnedBySelf, Some(viewer)))
            .await
            .expect("feed");

        assert_eq!(page.total_data(), 25);
        assert_eq!(page.total_page(), 3);
        assert_eq!(page.page(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn connection_failures_map_to_service_unavailable() {
        let mut repo = MockNoteRepository::new();
        repo.expect_count()
            .return_once(|_| Err(NoteRepositoryError::connection("refused")));
        let service = NoteFeedService::new(Arc::new(repo));

        let err = service
            .feed(request(ContentCategory::Home, None))
            .await
            .expect_err("unavailable");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
