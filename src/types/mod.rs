//! Core types shared across the sorter.
//!
//! - [`cancel`]: Cancellation reason and kind types

pub mod cancel;

pub use cancel::{CancelKind, CancelReason};
