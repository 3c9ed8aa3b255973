//! The sleep sorter.
//!
//! [`SleepSorter::run`] spawns one OS thread per value. Every thread parks at
//! a shared [`StartBarrier`] until the whole cohort exists, then sleeps for
//! `value × time_step` while racing the run's [`CancelSignal`]. Threads that
//! win the race push their value into a bounded result channel; the calling
//! thread drains that channel back into the [`ValueSource`] and verifies that
//! the output never decreases.
//!
//! ```
//! use sleepsort::{ArraySource, SleepSorter};
//! use std::time::Duration;
//!
//! let mut sorter = SleepSorter::new(ArraySource::new(vec![3, 1, 2]), Duration::from_millis(10));
//! sorter.run()?;
//! assert_eq!(sorter.source().as_slice(), &[1, 2, 3]);
//! # Ok::<(), sleepsort::SortError>(())
//! ```
//!
//! # Cancellation
//!
//! Each sorter owns one signal for its whole life. [`SleepSorter::kill`] or a
//! [`KillHandle`] fires it from any thread; a killed sorter stays killed and
//! later runs fail with [`SortError::Killed`] without spawning anything.

mod collect;
mod task;

use crate::config::SorterConfig;
use crate::error::SortError;
use crate::source::ValueSource;
use crate::sync::{CancelSignal, CancelWatcher, StartBarrier, result_channel};
use crate::tracing_compat::{debug, info, warn};
use crate::types::CancelReason;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use collect::collect;
use task::SortTask;

/// Lifecycle of a [`SleepSorter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SorterState {
    /// No run has started.
    Idle,
    /// A run is in progress.
    Running,
    /// The last run wrote every value in order.
    Completed,
    /// The last run was cancelled.
    Killed,
}

/// Statistics for a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of sort tasks spawned.
    pub tasks: usize,
    /// Number of values written back to the source.
    pub written: usize,
    /// Wall time from the start of spawning to the last write.
    pub elapsed: Duration,
}

/// Cancels a [`SleepSorter`] from another thread.
#[derive(Debug, Clone)]
pub struct KillHandle {
    signal: Arc<CancelSignal>,
}

impl KillHandle {
    /// Cancels the sorter. Repeated calls are ignored.
    pub fn kill(&self) {
        kill_signal(&self.signal);
    }

    /// Returns true once the sorter has been cancelled.
    #[must_use]
    pub fn is_killed(&self) -> bool {
        self.signal.is_cancelled()
    }
}

fn kill_signal(signal: &CancelSignal) {
    if signal.cancel(CancelReason::user("kill requested")) {
        debug!("kill requested");
    }
}

/// Sorts the values of a [`ValueSource`] by sleeping on them.
#[derive(Debug)]
pub struct SleepSorter<S> {
    source: S,
    config: SorterConfig,
    signal: Arc<CancelSignal>,
    state: SorterState,
    last_run: Option<RunSummary>,
}

impl<S: ValueSource> SleepSorter<S> {
    /// Creates a sorter with the default configuration and the given time-scale.
    #[must_use]
    pub fn new(source: S, time_step: Duration) -> Self {
        Self::with_config(source, SorterConfig::default().with_time_step(time_step))
    }

    /// Creates a sorter from a full configuration.
    #[must_use]
    pub fn with_config(source: S, config: SorterConfig) -> Self {
        Self {
            source,
            config,
            signal: Arc::new(CancelSignal::new()),
            state: SorterState::Idle,
            last_run: None,
        }
    }

    /// Sorts the source in place.
    ///
    /// Blocks until every value has been written back, the run is cancelled,
    /// or an ordering violation is detected. Every spawned thread has exited
    /// by the time this returns. An empty source succeeds immediately.
    ///
    /// # Errors
    ///
    /// - [`SortError::Killed`] if the sorter was killed before or during the
    ///   run.
    /// - [`SortError::UnsortedOutput`] if a value arrived after a larger one.
    ///   The run is cancelled; values already written stay in the source.
    /// - [`SortError::Spawn`] if a task thread could not be started.
    pub fn run(&mut self) -> Result<(), SortError> {
        self.source.reset();
        let tasks = self.source.num_left();
        if tasks == 0 {
            debug!("empty input, nothing to sort");
            self.state = SorterState::Completed;
            self.last_run = Some(RunSummary {
                tasks: 0,
                written: 0,
                elapsed: Duration::ZERO,
            });
            return Ok(());
        }
        if let Some(reason) = self.signal.reason() {
            debug!(%reason, "sorter already killed");
            self.state = SorterState::Killed;
            return Err(SortError::Killed { reason });
        }

        self.state = SorterState::Running;
        self.last_run = None;
        let time_step = self.config.time_step;
        info!(tasks, ?time_step, "sort run starting");
        let started = Instant::now();

        let signal = Arc::clone(&self.signal);
        let (sender, receiver) = result_channel(tasks, &signal);
        let barrier = Arc::new(StartBarrier::new(tasks));
        let watcher: Arc<dyn CancelWatcher> = barrier.clone();
        signal.register(Arc::downgrade(&watcher));

        let source = &mut self.source;
        let config = &self.config;
        let result = thread::scope(|scope| {
            for index in 0..tasks {
                let task = SortTask {
                    index,
                    value: source.next_value(),
                    time_step,
                    barrier: &barrier,
                    signal: &signal,
                    results: sender.clone(),
                };
                let mut builder =
                    thread::Builder::new().name(format!("{}-{index}", config.thread_name));
                if let Some(size) = config.stack_size {
                    builder = builder.stack_size(size);
                }
                if let Err(err) = builder.spawn_scoped(scope, move || task.run()) {
                    warn!(index, error = %err, "failed to spawn sort task");
                    signal.cancel(CancelReason::spawn_failed());
                    return Err(SortError::Spawn { index, source: err });
                }
            }
            drop(sender);
            source.reset();
            collect(&receiver, source, &signal, tasks)
        });

        match result {
            Ok(written) => {
                let elapsed = started.elapsed();
                info!(written, ?elapsed, "sort run completed");
                self.state = SorterState::Completed;
                self.last_run = Some(RunSummary {
                    tasks,
                    written,
                    elapsed,
                });
                Ok(())
            }
            Err(err) => {
                debug!(error = %err, "sort run failed");
                self.state = SorterState::Killed;
                Err(err)
            }
        }
    }

    /// Cancels the current or next run. Safe to call any number of times
    /// from any thread holding a reference.
    pub fn kill(&self) {
        kill_signal(&self.signal);
    }

    /// Returns a handle that can kill this sorter while [`run`](Self::run)
    /// holds it mutably.
    #[must_use]
    pub fn kill_handle(&self) -> KillHandle {
        KillHandle {
            signal: Arc::clone(&self.signal),
        }
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> SorterState {
        self.state
    }

    /// Returns the configured time-scale.
    #[must_use]
    pub fn time_step(&self) -> Duration {
        self.config.time_step
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    /// Returns statistics for the last successful run.
    #[must_use]
    pub fn last_run(&self) -> Option<&RunSummary> {
        self.last_run.as_ref()
    }

    /// Returns the source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the source mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consumes the sorter and returns the source.
    #[must_use]
    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::{ArraySource, BoundedRandomSource};
    use crate::test_logging::init_test;
    use crate::types::CancelKind;

    #[test]
    fn sorts_a_small_array() {
        init_test("sorts_a_small_array");
        let mut sorter =
            SleepSorter::new(ArraySource::new(vec![3, 1, 2]), Duration::from_millis(10));
        assert_eq!(sorter.state(), SorterState::Idle);
        sorter.run().unwrap();
        assert_eq!(sorter.state(), SorterState::Completed);
        assert_eq!(sorter.source().as_slice(), &[1, 2, 3]);
        let summary = sorter.last_run().unwrap();
        assert_eq!((summary.tasks, summary.written), (3, 3));
        assert!(summary.elapsed >= Duration::from_millis(30));
    }

    #[test]
    fn empty_source_completes_immediately() {
        init_test("empty_source_completes_immediately");
        let mut sorter =
            SleepSorter::new(ArraySource::new(Vec::<u64>::new()), Duration::from_secs(1));
        sorter.run().unwrap();
        assert_eq!(sorter.state(), SorterState::Completed);
        assert_eq!(sorter.last_run().map(|s| s.written), Some(0));
    }

    #[test]
    fn kill_before_run_is_honored() {
        init_test("kill_before_run_is_honored");
        let mut sorter = SleepSorter::new(ArraySource::new(vec![1, 2]), Duration::from_millis(1));
        sorter.kill();
        sorter.kill();
        let err = sorter.run().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProcessingKilled);
        assert_eq!(sorter.state(), SorterState::Killed);
        assert_eq!(sorter.source().as_slice(), &[1, 2]);
        assert!(sorter.last_run().is_none());
    }

    #[test]
    fn kill_handle_stops_a_long_run() {
        init_test("kill_handle_stops_a_long_run");
        let mut sorter = SleepSorter::new(
            BoundedRandomSource::with_seed(64, 1_000, 7),
            Duration::from_secs(3600),
        );
        let handle = sorter.kill_handle();
        let killer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            handle.kill();
            handle.is_killed()
        });
        let started = Instant::now();
        let err = sorter.run().unwrap_err();
        assert!(killer.join().unwrap());
        assert!(started.elapsed() < Duration::from_secs(60));
        match err {
            SortError::Killed { reason } => assert_eq!(reason.kind(), CancelKind::User),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn time_step_is_kept_as_configured() {
        init_test("time_step_is_kept_as_configured");
        let sorter = SleepSorter::new(ArraySource::new(vec![1]), Duration::from_nanos(7));
        assert_eq!(sorter.time_step(), Duration::from_nanos(7));
        assert_eq!(sorter.config().thread_name, SorterConfig::DEFAULT_THREAD_NAME);
    }

    #[test]
    fn zero_time_step_preserves_count() {
        init_test("zero_time_step_preserves_count");
        let mut sorter = SleepSorter::new(ArraySource::new(vec![5, 0, 3, 3, 1]), Duration::ZERO);
        match sorter.run() {
            Ok(()) => {
                let mut values = sorter.into_source().into_inner();
                values.sort_unstable();
                assert_eq!(values, vec![0, 1, 3, 3, 5]);
            }
            Err(err) => assert!(err.is_unsorted()),
        }
    }

    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    #[test]
    fn spawn_failure_is_reported() {
        init_test("spawn_failure_is_reported");
        let config = SorterConfig::default()
            .with_time_step(Duration::from_millis(1))
            .with_stack_size(Some(1 << 60));
        let mut sorter = SleepSorter::with_config(ArraySource::new(vec![1, 2]), config);
        let err = sorter.run().unwrap_err();
        assert!(matches!(err, SortError::Spawn { index: 0, .. }));
        assert_eq!(sorter.state(), SorterState::Killed);
        assert!(sorter.kill_handle().is_killed());
    }

    #[test]
    fn runs_can_repeat_until_killed() {
        init_test("runs_can_repeat_until_killed");
        let mut sorter = SleepSorter::new(ArraySource::new(vec![2, 1]), Duration::from_millis(5));
        sorter.run().unwrap();
        sorter.source_mut().reset();
        sorter.run().unwrap();
        assert_eq!(sorter.source().as_slice(), &[1, 2]);
        sorter.kill();
        assert!(sorter.run().unwrap_err().is_killed());
    }
}
