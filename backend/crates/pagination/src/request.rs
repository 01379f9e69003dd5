//! Page request normalization and window arithmetic.

/// Index of the first page. Page indices are one-based.
pub const FIRST_PAGE: u32 = 1;

/// A normalized page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `limit >= 1`
///
/// Constructors clamp out-of-range input instead of failing so callers can
/// feed raw client values straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request, clamping `page` and `limit` to at least one.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::new(0, 0);
    /// assert_eq!((request.page(), request.limit()), (1, 1));
    /// ```
    #[must_use]
    pub const fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page < FIRST_PAGE { FIRST_PAGE } else { page },
            limit: if limit < 1 { 1 } else { limit },
        }
    }

    /// Build a request from raw query-string values.
    ///
    /// A missing, unparsable, zero or negative `page` becomes the first page.
    /// A missing, unparsable, zero or negative `limit` becomes
    /// `default_limit` (itself clamped to at least one).
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let request = PageRequest::from_query(Some("-4"), Some("abc"), 5);
    /// assert_eq!((request.page(), request.limit()), (1, 5));
    /// ```
    #[must_use]
    pub fn from_query(page: Option<&str>, limit: Option<&str>, default_limit: u32) -> Self {
        Self::new(
            page.and_then(parse_positive).unwrap_or(FIRST_PAGE),
            limit.and_then(parse_positive).unwrap_or(default_limit),
        )
    }

    /// One-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset/limit pair for the persistence layer.
    #[must_use]
    pub const fn window(&self) -> PageWindow {
        PageWindow {
            offset: (self.page as u64 - 1) * self.limit as u64,
            limit: self.limit,
        }
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value >= 1)
}

/// Offset and limit derived from a [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageWindow {
    offset: u64,
    limit: u32,
}

impl PageWindow {
    /// Number of records to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of records to take.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset as a signed value for SQL `OFFSET` clauses.
    ///
    /// Saturates at `i64::MAX`.
    #[must_use]
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// Limit as a signed value for SQL `LIMIT` clauses.
    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }

    /// Offset as a `usize` for slicing in-memory collections.
    ///
    /// Saturates at `usize::MAX`.
    #[must_use]
    pub fn offset_usize(&self) -> usize {
        usize::try_from(self.offset).unwrap_or(usize::MAX)
    }

    /// Limit as a `usize` for slicing in-memory collections.
    #[must_use]
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}
