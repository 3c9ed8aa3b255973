//! One-shot start barrier.
//!
//! Every sort task parks here until the whole cohort has been spawned, so the
//! timed waits all start from the same instant regardless of how long spawning
//! took. Unlike `std::sync::Barrier` this one can be aborted: when the run is
//! cancelled before the cohort assembles (an external kill during spawning, or
//! a failed spawn that means the cohort never will), parked tasks are released
//! with [`BarrierAborted`].
//!
//! The release instant is recorded once under the lock and handed to every
//! party, so deadlines computed from it do not depend on when each thread
//! happens to be scheduled after wakeup.

use super::cancel::CancelWatcher;
use parking_lot::{Condvar, Mutex};
use std::time::Instant;
use thiserror::Error;

/// Returned by [`StartBarrier::wait`] when the barrier was aborted before
/// every party arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("start barrier aborted before all parties arrived")]
pub struct BarrierAborted;

/// Result of a successful [`StartBarrier::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWaitResult {
    is_leader: bool,
    released_at: Instant,
}

impl BarrierWaitResult {
    /// Returns true for exactly one party: the arrival that released the
    /// barrier.
    #[must_use]
    pub const fn is_leader(&self) -> bool {
        self.is_leader
    }

    /// Returns the instant the barrier released. Identical for every party.
    #[must_use]
    pub const fn released_at(&self) -> Instant {
        self.released_at
    }
}

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    released_at: Option<Instant>,
    aborted: bool,
}

/// A single-use rendezvous for a fixed number of parties.
#[derive(Debug)]
pub struct StartBarrier {
    expected: usize,
    state: Mutex<BarrierState>,
    cond: Condvar,
}

impl StartBarrier {
    /// Creates a barrier that releases once `expected` parties have arrived.
    ///
    /// A barrier expecting zero parties starts out released.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            state: Mutex::new(BarrierState {
                arrived: 0,
                released_at: (expected == 0).then(Instant::now),
                aborted: false,
            }),
            cond: Condvar::new(),
        }
    }

    /// Returns the number of parties the barrier waits for.
    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Returns how many parties have arrived so far.
    #[must_use]
    pub fn arrived(&self) -> usize {
        self.state.lock().arrived
    }

    /// Returns true once the barrier has released its cohort.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.state.lock().released_at.is_some()
    }

    /// Registers an arrival and blocks until the cohort is complete.
    ///
    /// Arrivals after release pass straight through as non-leaders.
    pub fn wait(&self) -> Result<BarrierWaitResult, BarrierAborted> {
        let mut state = self.state.lock();
        if let Some(released_at) = state.released_at {
            state.arrived += 1;
            return Ok(BarrierWaitResult {
                is_leader: false,
                released_at,
            });
        }
        if state.aborted {
            return Err(BarrierAborted);
        }
        state.arrived += 1;
        if state.arrived >= self.expected {
            let released_at = Instant::now();
            state.released_at = Some(released_at);
            self.cond.notify_all();
            return Ok(BarrierWaitResult {
                is_leader: true,
                released_at,
            });
        }
        loop {
            if let Some(released_at) = state.released_at {
                return Ok(BarrierWaitResult {
                    is_leader: false,
                    released_at,
                });
            }
            if state.aborted {
                return Err(BarrierAborted);
            }
            self.cond.wait(&mut state);
        }
    }

    /// Releases every parked party with [`BarrierAborted`].
    ///
    /// Has no effect once the barrier has released.
    pub fn abort(&self) {
        let mut state = self.state.lock();
        if state.released_at.is_some() {
            return;
        }
        state.aborted = true;
        self.cond.notify_all();
    }
}

impl CancelWatcher for StartBarrier {
    fn on_cancel(&self) {
        self.abort();
    }
}
