//! UUID-backed identifiers for content records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_uuid_id! {
    /// Identifier of a note.
    NoteId
}

define_uuid_id! {
    /// Identifier of a study (a subject notes are filed under).
    StudyId
}

define_uuid_id! {
    /// Identifier of a tag.
    TagId
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn ids_serialize_as_bare_uuid_strings() {
        let id = StudyId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialize");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }

    #[rstest]
    fn ids_reject_non_uuid_text() {
        assert!("study-1".parse::<TagId>().is_err());
    }
}
