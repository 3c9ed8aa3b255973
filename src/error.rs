//! Error types for sort runs.
//!
//! Every failure of [`SleepSorter::run`](crate::sorter::SleepSorter::run)
//! surfaces synchronously as a [`SortError`]. Misusing a
//! [`ValueSource`](crate::source::ValueSource) (reading past its end) is a
//! contract violation and panics instead; it never appears here.

use crate::types::CancelReason;
use thiserror::Error;

/// Coarse classification of a [`SortError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value arrived after a strictly larger one.
    UnsortedOutput,
    /// The run was cancelled before every value arrived.
    ProcessingKilled,
    /// A sort task could not be started.
    Spawn,
}

/// Error returned by a sort run.
#[derive(Debug, Error)]
pub enum SortError {
    /// The consumer received `value` after already writing `previous`.
    ///
    /// Detection cancels the whole run.
    #[error("output not sorted: {value} is less than previously seen {previous}")]
    UnsortedOutput {
        /// The late, smaller value.
        value: u64,
        /// The largest value written before it.
        previous: u64,
    },
    /// Cancellation fired before all values were consumed.
    #[error("processing killed ({reason})")]
    Killed {
        /// Why the run was cancelled.
        reason: CancelReason,
    },
    /// The OS refused to start the thread for the task at `index`.
    #[error("failed to spawn sort task {index}")]
    Spawn {
        /// Position of the value whose task failed to start.
        index: usize,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },
}

impl SortError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsortedOutput { .. } => ErrorKind::UnsortedOutput,
            Self::Killed { .. } => ErrorKind::ProcessingKilled,
            Self::Spawn { .. } => ErrorKind::Spawn,
        }
    }

    /// Returns true if the run was cancelled before completing.
    #[must_use]
    pub const fn is_killed(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }

    /// Returns true if out-of-order output was detected.
    #[must_use]
    pub const fn is_unsorted(&self) -> bool {
        matches!(self, Self::UnsortedOutput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn unsorted_message_names_both_values() {
        let err = SortError::UnsortedOutput {
            value: 2,
            previous: 3,
        };
        assert_eq!(
            err.to_string(),
            "output not sorted: 2 is less than previously seen 3"
        );
        assert_eq!(err.kind(), ErrorKind::UnsortedOutput);
        assert!(err.is_unsorted());
    }

    #[test]
    fn killed_message_includes_reason() {
        let err = SortError::Killed {
            reason: CancelReason::user("kill requested"),
        };
        assert_eq!(err.to_string(), "processing killed (user: kill requested)");
        assert_eq!(err.kind(), ErrorKind::ProcessingKilled);
        assert!(err.is_killed());
    }

    #[test]
    fn spawn_error_keeps_source() {
        let err = SortError::Spawn {
            index: 4,
            source: std::io::Error::other("no threads left"),
        };
        assert_eq!(err.kind(), ErrorKind::Spawn);
        assert_eq!(err.source().unwrap().to_string(), "no threads left");
    }
}
