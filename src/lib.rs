//! Sleepsort: sorting by sleeping, with a start barrier, cooperative
//! cancellation, and an ordering-verifying collector.
//!
//! # Overview
//!
//! A [`SleepSorter`] spawns one thread per input value. The threads wait at
//! a shared start barrier until every one of them exists, then each sleeps
//! for `value × time_step` and reports its value. Values that slept less
//! arrive first, and the caller's thread writes them back into the
//! [`ValueSource`] in arrival order. Any arrival smaller than an earlier one
//! cancels the run and surfaces as [`SortError::UnsortedOutput`].
//!
//! This is a study in synchronization, not a practical sort: run time grows
//! with the largest value and the thread count equals the input size.
//!
//! ```
//! use sleepsort::{ArraySource, SleepSorter};
//! use std::time::Duration;
//!
//! let mut values = [30, 10, 20];
//! let mut sorter = SleepSorter::new(ArraySource::new(&mut values[..]), Duration::from_millis(1));
//! sorter.run()?;
//! drop(sorter);
//! assert_eq!(values, [10, 20, 30]);
//! # Ok::<(), sleepsort::SortError>(())
//! ```
//!
//! # Module Structure
//!
//! - [`source`]: the [`ValueSource`] contract with array and random variants
//! - [`sorter`]: [`SleepSorter`], its kill handle, and run state
//! - [`sync`]: cancellation signal, start barrier, and result channel
//! - [`search`]: doubling search for a time-scale that sorts reliably
//! - [`config`]: [`SorterConfig`] with TOML and environment loading
//! - [`input`]: whitespace-delimited integer parsing
//! - [`time`]: delay arithmetic and duration strings
//! - [`types`]: cancellation reasons
//! - [`util`]: the explicitly seeded generator behind random sources
//! - [`error`]: [`SortError`]

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod input;
pub mod search;
pub mod sorter;
pub mod source;
pub mod sync;
pub mod time;
mod tracing_compat;
pub mod types;
pub mod util;

// ── Test-only modules ───────────────────────────────────────────────────
#[cfg(any(test, feature = "test-internals"))]
pub mod test_logging;

pub use config::{ConfigError, SorterConfig};
pub use error::{ErrorKind, SortError};
pub use search::{SearchError, SearchOutcome, TimeStepSearch};
pub use sorter::{KillHandle, RunSummary, SleepSorter, SorterState};
pub use source::{ArraySource, BoundedRandomSource, ValueSource};
pub use types::{CancelKind, CancelReason};
pub use util::DetRng;
