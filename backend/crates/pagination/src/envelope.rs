//! Paginated response envelope.

use serde::{Deserialize, Serialize};

/// Sort metadata echoed back on list endpoints that accept an `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetadata {
    /// The order key applied to the listing.
    pub order: String,
    /// Every order key the endpoint accepts.
    pub order_available: Vec<String>,
}

impl OrderMetadata {
    /// Build metadata from the applied key and the accepted keys.
    ///
    /// # Examples
    /// ```
    /// use pagination::OrderMetadata;
    ///
    /// let meta = OrderMetadata::new("new", ["new", "old"]);
    /// assert_eq!(meta.order_available.len(), 2);
    /// ```
    #[must_use]
    pub fn new<I, S>(order: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            order: order.into(),
            order_available: available.into_iter().map(Into::into).collect(),
        }
    }
}

/// Uniform envelope for paginated listings.
///
/// Serializes as
/// `{ "data": [...], "page", "limit", "totalData", "totalPage", "order"?, "orderAvailable"? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    data: Vec<T>,
    page: u32,
    limit: u32,
    total_data: u64,
    total_page: u64,
    #[serde(flatten)]
    order: Option<OrderMetadata>,
}

impl<T> Paginated<T> {
    /// Items on this page.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// One-based page index.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Total number of matching records across all pages.
    #[must_use]
    pub const fn total_data(&self) -> u64 {
        self.total_data
    }

    /// Number of pages needed to cover `total_data`.
    #[must_use]
    pub const fn total_page(&self) -> u64 {
        self.total_page
    }

    /// Sort metadata, when the endpoint supports ordering.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderMetadata> {
        self.order.as_ref()
    }

    /// Consume the envelope and return its items.
    #[must_use]
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Convert every item while keeping the page metadata.
    ///
    /// # Examples
    /// ```
    /// use pagination::paginate;
    ///
    /// let page = paginate(vec![1, 2], 1, 2, 2, None).map(|n| n * 10);
    /// assert_eq!(page.data(), &[10, 20]);
    /// ```
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_data: self.total_data,
            total_page: self.total_page,
            order: self.order,
        }
    }
}

/// Number of pages of size `limit` needed to hold `total` records.
///
/// Returns zero when `total` is zero. A zero `limit` is treated as one.
///
/// # Examples
/// ```
/// use pagination::total_pages;
///
/// assert_eq!(total_pages(25, 10), 3);
/// assert_eq!(total_pages(0, 10), 0);
/// ```
#[must_use]
pub fn total_pages(total: u64, limit: u32) -> u64 {
    total.div_ceil(u64::from(limit.max(1)))
}

/// Assemble the envelope for an already-windowed slice of items.
///
/// `items` is expected to hold at most `limit` records taken from offset
/// `(page - 1) * limit`; no further slicing happens here. `page` and `limit`
/// below one are clamped to one.
///
/// # Examples
/// ```
/// use pagination::{OrderMetadata, paginate};
///
/// let empty = paginate(Vec::<u8>::new(), 1, 10, 0, None);
/// assert_eq!(empty.total_page(), 0);
///
/// let ordered = paginate(vec![1], 1, 10, 1, Some(OrderMetadata::new("old", ["new", "old"])));
/// assert_eq!(ordered.order().map(|meta| meta.order.as_str()), Some("old"));
/// ```
#[must_use]
pub fn paginate<T>(
    items: Vec<T>,
    page: u32,
    limit: u32,
    total: u64,
    extra: Option<OrderMetadata>,
) -> Paginated<T> {
    let page_size = limit.max(1);
    Paginated {
        data: items,
        page: page.max(1),
        limit: page_size,
        total_data: total,
        total_page: total_pages(total, page_size),
        order: extra,
    }
}
