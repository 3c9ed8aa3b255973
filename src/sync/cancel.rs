//! One-shot broadcast cancellation signal.
//!
//! A [`CancelSignal`] moves from unsignaled to signaled exactly once. Every
//! party blocked in [`CancelSignal::wait_timeout`] or [`CancelSignal::wait`]
//! is released by the transition, and primitives that park on their own
//! condition variables (the start barrier, the result channel) subscribe as
//! [`CancelWatcher`]s so they are woken too.
//!
//! # Example
//!
//! ```
//! use sleepsort::sync::{CancelSignal, WaitOutcome};
//! use sleepsort::types::CancelReason;
//! use std::time::Duration;
//!
//! let signal = CancelSignal::new();
//! assert_eq!(signal.wait_timeout(Duration::ZERO), WaitOutcome::Elapsed);
//!
//! assert!(signal.cancel(CancelReason::user("stop")));
//! assert!(!signal.cancel(CancelReason::user("again")));
//! assert_eq!(signal.wait_timeout(Duration::from_secs(60)), WaitOutcome::Cancelled);
//! ```

use crate::types::CancelReason;
use parking_lot::{Condvar, Mutex};
use std::sync::Weak;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A primitive that must be woken when a [`CancelSignal`] fires.
///
/// `on_cancel` runs on the cancelling thread after the signal is already
/// observable through [`CancelSignal::is_cancelled`]. Implementations take
/// their own lock before notifying, so a waiter that checked the flag under
/// that lock cannot miss the wakeup.
pub trait CancelWatcher: Send + Sync {
    /// Wakes every party parked on this primitive.
    fn on_cancel(&self);
}

/// Result of racing a timer against a [`CancelSignal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The timer fired first.
    Elapsed,
    /// The signal fired first (or at the same instant as the timer).
    Cancelled,
}

#[derive(Default)]
struct SignalState {
    reason: Option<CancelReason>,
    watchers: Vec<Weak<dyn CancelWatcher>>,
}

/// A broadcast, idempotent, set-once cancellation flag.
pub struct CancelSignal {
    cancelled: AtomicBool,
    state: Mutex<SignalState>,
    cond: Condvar,
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish_non_exhaustive()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    /// Creates an unsignaled cancellation signal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            state: Mutex::new(SignalState::default()),
            cond: Condvar::new(),
        }
    }

    /// Fires the signal.
    ///
    /// Returns `true` for the single call that performed the transition and
    /// `false` for every later call. The first reason is kept.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let watchers = {
            let mut state = self.state.lock();
            if state.reason.is_some() {
                return false;
            }
            state.reason = Some(reason);
            self.cancelled.store(true, Ordering::Release);
            self.cond.notify_all();
            std::mem::take(&mut state.watchers)
        };
        for watcher in watchers.iter().filter_map(Weak::upgrade) {
            watcher.on_cancel();
        }
        true
    }

    /// Returns true once the signal has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Returns the reason recorded by the first [`cancel`](Self::cancel).
    #[must_use]
    pub fn reason(&self) -> Option<CancelReason> {
        self.state.lock().reason.clone()
    }

    /// Subscribes a watcher to the transition.
    ///
    /// If the signal has already fired, the watcher is notified immediately
    /// on the calling thread.
    pub fn register(&self, watcher: Weak<dyn CancelWatcher>) {
        let mut state = self.state.lock();
        if state.reason.is_some() {
            drop(state);
            if let Some(watcher) = watcher.upgrade() {
                watcher.on_cancel();
            }
            return;
        }
        state.watchers.retain(|w| w.strong_count() > 0);
        state.watchers.push(watcher);
    }

    /// Blocks until the signal fires or `timeout` elapses, whichever is first.
    pub fn wait_timeout(&self, timeout: Duration) -> WaitOutcome {
        if self.is_cancelled() {
            return WaitOutcome::Cancelled;
        }
        if timeout.is_zero() {
            return WaitOutcome::Elapsed;
        }
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_deadline(deadline),
            None => {
                self.wait();
                WaitOutcome::Cancelled
            }
        }
    }

    /// Blocks until the signal fires or `deadline` passes, whichever is first.
    ///
    /// A deadline already in the past returns [`WaitOutcome::Elapsed`] at
    /// once unless the signal has fired.
    pub fn wait_deadline(&self, deadline: Instant) -> WaitOutcome {
        let mut state = self.state.lock();
        while state.reason.is_none() {
            if Instant::now() >= deadline {
                return WaitOutcome::Elapsed;
            }
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                return if state.reason.is_some() {
                    WaitOutcome::Cancelled
                } else {
                    WaitOutcome::Elapsed
                };
            }
        }
        WaitOutcome::Cancelled
    }

    /// Blocks until the signal fires.
    pub fn wait(&self) {
        let mut state = self.state.lock();
        while state.reason.is_none() {
            self.cond.wait(&mut state);
        }
    }
}
