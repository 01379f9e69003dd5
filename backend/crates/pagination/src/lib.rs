//! Page-based pagination primitives shared by noteshare list endpoints.
//!
//! The crate owns two concerns:
//!
//! - [`PageRequest`] normalizes the `page` and `limit` query parameters and
//!   derives the [`PageWindow`] (offset and limit) pushed down to the
//!   persistence layer.
//! - [`Paginated`] is the uniform JSON envelope returned by list endpoints.
//!   [`paginate`] assembles it from an already-windowed slice of items and
//!   the total record count.
//!
//! # Examples
//!
//! ```
//! use pagination::{PageRequest, paginate};
//!
//! let request = PageRequest::from_query(Some("2"), Some("10"), 10);
//! assert_eq!(request.window().offset(), 10);
//!
//! let page = paginate(vec!["k"; 10], request.page(), request.limit(), 25, None);
//! assert_eq!(page.total_page(), 3);
//! ```

mod envelope;
mod request;

pub use envelope::{OrderMetadata, Paginated, paginate, total_pages};
pub use request::{FIRST_PAGE, PageRequest, PageWindow};
