//! The per-value sort task.

use crate::sync::{CancelSignal, ResultSender, StartBarrier, WaitOutcome};
use crate::time::scaled_delay;
use crate::tracing_compat::{trace, warn};
use std::time::Duration;

/// One value's trip through the barrier, the delay race, and the channel.
pub(super) struct SortTask<'a> {
    pub(super) index: usize,
    pub(super) value: u64,
    pub(super) time_step: Duration,
    pub(super) barrier: &'a StartBarrier,
    pub(super) signal: &'a CancelSignal,
    pub(super) results: ResultSender,
}

impl SortTask<'_> {
    /// Every task measures its delay from the barrier's release instant, so
    /// time a thread spends after wakeup (scheduling, logging) does not shift
    /// its deadline relative to the others.
    #[cfg_attr(not(feature = "tracing-integration"), allow(unused_variables))]
    pub(super) fn run(self) {
        let Ok(released) = self.barrier.wait() else {
            trace!(index = self.index, "barrier aborted before start");
            return;
        };

        let delay = scaled_delay(self.value, self.time_step);
        let outcome = match released.released_at().checked_add(delay) {
            Some(deadline) => self.signal.wait_deadline(deadline),
            None => self.signal.wait_timeout(delay),
        };
        match outcome {
            WaitOutcome::Elapsed => match self.results.send(self.value) {
                Ok(()) => trace!(index = self.index, value = self.value, "delivered"),
                Err(err) => warn!(index = self.index, error = %err, "delivery failed"),
            },
            WaitOutcome::Cancelled => {
                trace!(index = self.index, value = self.value, "cancelled before delivery");
            }
        }
    }
}
