//! Synchronization primitives for a sort run.
//!
//! A run coordinates its tasks through three primitives:
//!
//! - [`StartBarrier`]: one-shot rendezvous that starts every task's clock at
//!   the same instant
//! - [`CancelSignal`]: set-once broadcast flag raced against every wait
//! - [`result_channel`]: bounded, never-blocking conduit from tasks to the
//!   consumer
//!
//! The barrier and the channel receiver subscribe to the signal as
//! [`CancelWatcher`]s, so a single `cancel` releases every parked thread.

pub mod barrier;
pub mod cancel;
pub mod channel;

pub use barrier::{BarrierAborted, BarrierWaitResult, StartBarrier};
pub use cancel::{CancelSignal, CancelWatcher, WaitOutcome};
pub use channel::{RecvError, ResultReceiver, ResultSender, SendError, result_channel};
