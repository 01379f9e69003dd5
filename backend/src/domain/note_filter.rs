//! Visibility categories and the note predicates they resolve to.
//!
//! A feed request names a [`ContentCategory`]; [`resolve_filter`] turns it
//! and the optional viewer into a [`NotePredicate`]. The predicate is plain
//! data: the Diesel adapter compiles it to SQL and the in-memory fixture
//! evaluates it with [`NotePredicate::matches`].
//!
//! Every viewer-scoped category resolves to [`NotePredicate::Never`] when
//! the viewer is absent.

use std::fmt;
use std::str::FromStr;

use super::user::UserId;

/// Visibility scope selected by the `category` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    /// Public notes, plus the viewer's own and shared private notes.
    #[default]
    Home,
    /// Notes explicitly shared with the viewer.
    Shared,
    /// Private notes and notes shared with the viewer.
    Private,
    /// Notes the viewer marked as favourite.
    Favorited,
    /// Notes the viewer saved.
    Saved,
    /// Notes the viewer owns.
    OwnedBySelf,
}

impl ContentCategory {
    /// Every category, in the order advertised to clients.
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::Shared,
        Self::Private,
        Self::Favorited,
        Self::Saved,
        Self::OwnedBySelf,
    ];

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Shared => "shared",
            Self::Private => "private",
            Self::Favorited => "favorited",
            Self::Saved => "saved",
            Self::OwnedBySelf => "self",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a `category` value is not one of [`ContentCategory::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for ContentCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// Per-user interaction flags recorded against a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionFlag {
    Favorited,
    Saved,
}

/// Declarative filter over notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotePredicate {
    /// Matches no note.
    Never,
    /// Matches notes whose private flag equals the value.
    IsPrivate(bool),
    /// Matches notes owned by the user.
    OwnedBy(UserId),
    /// Matches notes carrying a permission grant for the user.
    PermissionGrantedTo(UserId),
    /// Matches notes where the user set the interaction flag.
    Interaction { user: UserId, flag: InteractionFlag },
    /// Matches when every child matches; empty matches everything.
    All(Vec<NotePredicate>),
    /// Matches when any child matches; empty matches nothing.
    Any(Vec<NotePredicate>),
}

/// Facts about one note needed to evaluate a [`NotePredicate`] in memory.
pub trait NoteFacts {
    /// Whether the note is private.
    fn is_private(&self) -> bool;
    /// Owner of the note.
    fn owner_id(&self) -> &UserId;
    /// Whether `user` holds a permission grant on the note.
    fn is_granted_to(&self, user: &UserId) -> bool;
    /// Whether `user` set `flag` on the note.
    fn has_interaction(&self, user: &UserId, flag: InteractionFlag) -> bool;
}

impl NotePredicate {
    /// Whether the predicate can match nothing by construction.
    pub fn is_unsatisfiable(&self) -> bool {
        match self {
            Self::Never => true,
            Self::Any(children) => children.iter().all(Self::is_unsatisfiable),
            Self::All(children) => children.iter().any(Self::is_unsatisfiable),
            _ => false,
        }
    }

    /// Evaluate the predicate against one note.
    pub fn matches<F: NoteFacts + ?Sized>(&self, note: &F) -> bool {
        match self {
            Self::Never => false,
            Self::IsPrivate(flag) => note.is_private() == *flag,
            Self::OwnedBy(user) => note.owner_id() == user,
            Self::PermissionGrantedTo(user) => note.is_granted_to(user),
            Self::Interaction { user, flag } => note.has_interaction(user, *flag),
            Self::All(children) => children.iter().all(|child| child.matches(note)),
            Self::Any(children) => children.iter().any(|child| child.matches(note)),
        }
    }
}

/// Resolve a category and optional viewer into a note predicate.
///
/// # Examples
/// ```
/// use noteshare::domain::{ContentCategory, NotePredicate, resolve_filter};
///
/// assert_eq!(resolve_filter(ContentCategory::Saved, None), NotePredicate::Never);
/// assert!(!resolve_filter(ContentCategory::Home, None).is_unsatisfiable());
/// ```
pub fn resolve_filter(category: ContentCategory, viewer: Option<&UserId>) -> NotePredicate {
    use NotePredicate::{All, Any, Interaction, IsPrivate, Never, OwnedBy, PermissionGrantedTo};

    match (category, viewer) {
        (ContentCategory::Home, None) => Any(vec![IsPrivate(false)]),
        (ContentCategory::Home, Some(viewer)) => Any(vec![
            IsPrivate(false),
            All(vec![
                IsPrivate(true),
                Any(vec![
                    OwnedBy(viewer.clone()),
                    PermissionGrantedTo(viewer.clone()),
                ]),
            ]),
        ]),
        (ContentCategory::Private, Some(viewer)) => {
            Any(vec![IsPrivate(true), PermissionGrantedTo(viewer.clone())])
        }
        (ContentCategory::Shared, Some(viewer)) => PermissionGrantedTo(viewer.clone()),
        (ContentCategory::OwnedBySelf, Some(viewer)) => OwnedBy(viewer.clone()),
        (ContentCategory::Favorited, Some(viewer)) => Interaction {
            user: viewer.clone(),
            flag: InteractionFlag::Favorited,
        },
        (ContentCategory::Saved, Some(viewer)) => Interaction {
            user: viewer.clone(),
            flag: InteractionFlag::Saved,
        },
        (
            ContentCategory::Private
            | ContentCategory::Shared
            | ContentCategory::OwnedBySelf
            | ContentCategory::Favorited
            | ContentCategory::Saved,
            None,
        ) => Never,
    }
}
