//! Studies: subjects that notes are filed under.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::ids::StudyId;
use super::name_search::ResourceName;
use super::ordering::{OrderKey, SortDirection};

/// A study as stored and returned to clients.
///
/// `note_count` is maintained by the persistence layer whenever a note is
/// filed under or removed from the study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    #[schema(value_type = String)]
    pub id: StudyId,
    pub name: String,
    pub description: String,
    /// URL of an already-uploaded cover image.
    pub image: Option<String>,
    pub note_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDraft {
    pub name: ResourceName,
    pub description: String,
    pub image: Option<String>,
}

/// Partial update to a study; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyChanges {
    pub name: Option<ResourceName>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl StudyChanges {
    /// Apply the changes to a study in place, returning the replaced image
    /// URL when the image changed.
    pub fn apply_to(&self, study: &mut Study) -> Option<String> {
        if let Some(name) = &self.name {
            study.name = name.to_string();
        }
        if let Some(description) = &self.description {
            study.description.clone_from(description);
        }
        match &self.image {
            Some(image) if study.image.as_ref() != Some(image) => {
                study.image.replace(image.clone())
            }
            _ => None,
        }
    }
}

/// Sort key for study listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StudyOrder {
    #[default]
    New,
    Old,
    MostNotes,
    LeastNotes,
}

impl OrderKey for StudyOrder {
    const ALL: &'static [Self] = &[Self::New, Self::Old, Self::MostNotes, Self::LeastNotes];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
            Self::MostNotes => "most-notes",
            Self::LeastNotes => "least-notes",
        }
    }
}

impl StudyOrder {
    /// Direction applied to the order's column.
    pub fn direction(self) -> SortDirection {
        match self {
            Self::New | Self::MostNotes => SortDirection::Desc,
            Self::Old | Self::LeastNotes => SortDirection::Asc,
        }
    }

    /// Compare two studies under this order. Ties are broken by id.
    pub fn compare(self, left: &Study, right: &Study) -> Ordering {
        let primary = match self {
            Self::New | Self::Old => left.created_at.cmp(&right.created_at),
            Self::MostNotes | Self::LeastNotes => left.note_count.cmp(&right.note_count),
        };
        self.direction()
            .apply(primary)
            .then_with(|| left.id.cmp(&right.id))
    }
}
