//! Shared behaviour for the per-resource sort-key enums.
//!
//! Each list endpoint accepts an `order` query parameter drawn from a small
//! fixed set of keys. Unknown or missing keys fall back to the resource's
//! default key; the applied key and the accepted keys are echoed back in the
//! response envelope.

use pagination::OrderMetadata;

/// A closed set of sort keys accepted by one list endpoint.
pub trait OrderKey: Copy + Default + 'static {
    /// Every accepted key, in the order advertised to clients.
    const ALL: &'static [Self];

    /// Wire representation of the key.
    fn as_str(self) -> &'static str;

    /// Match a wire value exactly.
    fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == raw)
    }

    /// Resolve an optional wire value, falling back to [`Default::default`].
    fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(Self::from_wire).unwrap_or_default()
    }

    /// Envelope metadata describing this key and its alternatives.
    fn metadata(self) -> OrderMetadata {
        OrderMetadata::new(self.as_str(), Self::ALL.iter().map(|key| key.as_str()))
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Orient an ascending comparison result.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}
