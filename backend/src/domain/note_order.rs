//! Sort keys for the note feed and the expressions they resolve to.

use std::cmp::Ordering;

use super::note::Note;
use super::ordering::{OrderKey, SortDirection};

/// Sort key selected by the feed's `order` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    New,
    Old,
    Best,
    Worst,
}

impl OrderKey for SortKey {
    const ALL: &'static [Self] = &[Self::New, Self::Old, Self::Best, Self::Worst];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
            Self::Best => "best",
            Self::Worst => "worst",
        }
    }
}

/// Note column a feed can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    CreatedAt,
    UpvotedCount,
    DownvotedCount,
}

/// Declarative sort over notes. Ties are broken by note id, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortExpression {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortExpression {
    /// Compare two notes under this expression.
    pub fn compare(&self, left: &Note, right: &Note) -> Ordering {
        let primary = match self.field {
            SortField::CreatedAt => left.created_at.cmp(&right.created_at),
            SortField::UpvotedCount => left.upvoted_count.cmp(&right.upvoted_count),
            SortField::DownvotedCount => left.downvoted_count.cmp(&right.downvoted_count),
        };
        self.direction
            .apply(primary)
            .then_with(|| left.id.cmp(&right.id))
    }
}

/// Map a sort key to its sort expression.
pub fn resolve_order(key: SortKey) -> SortExpression {
    let (field, direction) = match key {
        SortKey::New => (SortField::CreatedAt, SortDirection::Desc),
        SortKey::Old => (SortField::CreatedAt, SortDirection::Asc),
        SortKey::Best => (SortField::UpvotedCount, SortDirection::Desc),
        SortKey::Worst => (SortField::DownvotedCount, SortDirection::Desc),
    };
    SortExpression { field, direction }
}
