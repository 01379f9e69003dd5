//! Note read model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::ids::{NoteId, StudyId};
use super::user::UserId;

/// A note as returned by feed listings.
///
/// Vote counters are denormalized onto the note so `best`/`worst` ordering
/// does not need an aggregate join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[schema(value_type = String)]
    pub id: NoteId,
    #[schema(value_type = String)]
    pub user_id: UserId,
    #[schema(value_type = Option<String>)]
    pub study_id: Option<StudyId>,
    pub title: String,
    pub description: Option<String>,
    pub is_private: bool,
    pub upvoted_count: u32,
    pub downvoted_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
