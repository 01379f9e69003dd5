//! Request middleware.
//!
//! [`Trace`] scopes a per-request trace id and echoes it in the `trace-id`
//! response header.

pub mod trace;

pub use trace::Trace;
