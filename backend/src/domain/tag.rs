//! Tags attached to notes.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::ids::TagId;
use super::ordering::{OrderKey, SortDirection};

/// A tag as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[schema(value_type = String)]
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort key for tag listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagOrder {
    #[default]
    New,
    Old,
}

impl OrderKey for TagOrder {
    const ALL: &'static [Self] = &[Self::New, Self::Old];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }
}

impl TagOrder {
    /// Direction applied to `created_at`.
    pub fn direction(self) -> SortDirection {
        match self {
            Self::New => SortDirection::Desc,
            Self::Old => SortDirection::Asc,
        }
    }

    /// Compare two tags under this order. Ties are broken by id.
    pub fn compare(self, left: &Tag, right: &Tag) -> Ordering {
        self.direction()
            .apply(left.created_at.cmp(&right.created_at))
            .then_with(|| left.id.cmp(&right.id))
    }
}
