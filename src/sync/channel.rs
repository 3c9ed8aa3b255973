//! Bounded result channel between sort tasks and the consumer.
//!
//! Values travel through a lock-free [`ArrayQueue`] sized to the number of
//! tasks in the run, so a sender never blocks. The single receiver parks on a
//! condition variable and races each receive against the run's
//! [`CancelSignal`].

use super::cancel::{CancelSignal, CancelWatcher};
use crossbeam_queue::ArrayQueue;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use thiserror::Error;

/// Error returned by [`ResultSender::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The channel already holds `capacity` undelivered values.
    #[error("result channel full, dropped {0}")]
    Full(u64),
}

/// Error returned by [`ResultReceiver::recv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecvError {
    /// The cancellation signal fired before a value was received.
    #[error("receive cancelled")]
    Cancelled,
}

struct Shared {
    queue: ArrayQueue<u64>,
    lock: Mutex<()>,
    ready: Condvar,
}

impl Shared {
    fn wake(&self) {
        let _guard = self.lock.lock();
        self.ready.notify_all();
    }
}

impl CancelWatcher for Shared {
    fn on_cancel(&self) {
        self.wake();
    }
}

/// Creates a bounded channel whose receiver is bound to `signal`.
///
/// A `capacity` of zero is rounded up to one.
#[must_use]
pub fn result_channel(
    capacity: usize,
    signal: &Arc<CancelSignal>,
) -> (ResultSender, ResultReceiver) {
    let shared = Arc::new(Shared {
        queue: ArrayQueue::new(capacity.max(1)),
        lock: Mutex::new(()),
        ready: Condvar::new(),
    });
    let watcher: Arc<dyn CancelWatcher> = shared.clone();
    signal.register(Arc::downgrade(&watcher));
    (
        ResultSender {
            shared: Arc::clone(&shared),
        },
        ResultReceiver {
            shared,
            signal: Arc::clone(signal),
        },
    )
}

/// Producer half of the result channel.
#[derive(Clone)]
pub struct ResultSender {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for ResultSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultSender")
            .field("len", &self.shared.queue.len())
            .field("capacity", &self.shared.queue.capacity())
            .finish()
    }
}

impl ResultSender {
    /// Delivers a value without blocking.
    pub fn send(&self, value: u64) -> Result<(), SendError> {
        self.shared.queue.push(value).map_err(SendError::Full)?;
        self.shared.wake();
        Ok(())
    }
}

/// Consumer half of the result channel.
pub struct ResultReceiver {
    shared: Arc<Shared>,
    signal: Arc<CancelSignal>,
}

impl std::fmt::Debug for ResultReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultReceiver")
            .field("len", &self.shared.queue.len())
            .field("cancelled", &self.signal.is_cancelled())
            .finish()
    }
}

impl ResultReceiver {
    /// Blocks until a value arrives or the signal fires.
    ///
    /// When both are ready the cancellation wins, so nothing is handed to the
    /// consumer after the run has been cancelled.
    pub fn recv(&self) -> Result<u64, RecvError> {
        loop {
            if self.signal.is_cancelled() {
                return Err(RecvError::Cancelled);
            }
            if let Some(value) = self.shared.queue.pop() {
                return Ok(value);
            }
            let mut guard = self.shared.lock.lock();
            if self.signal.is_cancelled() || !self.shared.queue.is_empty() {
                continue;
            }
            self.shared.ready.wait(&mut guard);
        }
    }

    /// Returns a value if one is already buffered, without waiting.
    pub fn try_recv(&self) -> Option<u64> {
        self.shared.queue.pop()
    }

    /// Returns the number of buffered values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.queue.len()
    }

    /// Returns true if no value is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.queue.is_empty()
    }
}
