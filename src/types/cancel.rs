//! Cancellation reason and kind types.
//!
//! A sort run is cancelled at most once. This module describes why that
//! happened so the consumer can report it alongside the error.

use core::fmt;

/// The kind of cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CancelKind {
    /// Explicit kill requested through [`SleepSorter::kill`] or a
    /// [`KillHandle`].
    ///
    /// [`SleepSorter::kill`]: crate::sorter::SleepSorter::kill
    /// [`KillHandle`]: crate::sorter::KillHandle
    User,
    /// The consumer saw a value smaller than one it had already written.
    OrderViolation,
    /// A sort task could not be spawned, so the cohort can never assemble.
    SpawnFailed,
}

impl fmt::Display for CancelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::OrderViolation => write!(f, "order violation"),
            Self::SpawnFailed => write!(f, "spawn failed"),
        }
    }
}

/// The reason for a cancellation, including kind and optional context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelReason {
    /// The kind of cancellation.
    pub kind: CancelKind,
    /// Optional human-readable message.
    pub message: Option<&'static str>,
}

impl CancelReason {
    /// Creates a new cancellation reason with the given kind.
    #[must_use]
    pub const fn new(kind: CancelKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Creates a user cancellation reason with a message.
    #[must_use]
    pub const fn user(message: &'static str) -> Self {
        Self {
            kind: CancelKind::User,
            message: Some(message),
        }
    }

    /// Creates the reason recorded when the consumer detects unsorted output.
    #[must_use]
    pub const fn order_violation() -> Self {
        Self::new(CancelKind::OrderViolation)
    }

    /// Creates the reason recorded when a sort task fails to spawn.
    #[must_use]
    pub const fn spawn_failed() -> Self {
        Self::new(CancelKind::SpawnFailed)
    }

    /// Returns the kind of this cancellation reason.
    #[must_use]
    pub const fn kind(&self) -> CancelKind {
        self.kind
    }

    /// Returns true if the cancellation came from outside the run.
    #[must_use]
    pub const fn is_user(&self) -> bool {
        matches!(self.kind, CancelKind::User)
    }
}

impl Default for CancelReason {
    fn default() -> Self {
        Self::new(CancelKind::User)
    }
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(msg) = self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_message() {
        let reason = CancelReason::user("kill requested");
        assert_eq!(reason.to_string(), "user: kill requested");
        assert!(reason.is_user());
    }

    #[test]
    fn display_without_message() {
        assert_eq!(CancelReason::order_violation().to_string(), "order violation");
        assert_eq!(CancelReason::spawn_failed().to_string(), "spawn failed");
    }

    #[test]
    fn default_is_user() {
        assert_eq!(CancelReason::default().kind(), CancelKind::User);
    }
}
