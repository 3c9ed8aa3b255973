//! Searching for a time-scale that sorts reliably.
//!
//! Small time-scales finish fast but let scheduler jitter reorder close
//! values. [`TimeStepSearch`] starts at a minimum step and doubles it until a
//! run succeeds, trying several sorters side by side at each step and
//! keeping the first that finishes in order.

use crate::config::SorterConfig;
use crate::sorter::{KillHandle, SleepSorter};
use crate::source::ValueSource;
use crate::tracing_compat::{debug, info};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`TimeStepSearch::find`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The bounds leave nothing to search.
    #[error("invalid search range: min {min:?} must be non-zero and below max {max:?}")]
    InvalidRange {
        /// Lower bound.
        min: Duration,
        /// Exclusive upper bound.
        max: Duration,
    },
    /// No step below the upper bound produced a successful run.
    #[error("no time step below {max:?} sorted successfully after {attempts_run} attempts")]
    Exhausted {
        /// Exclusive upper bound.
        max: Duration,
        /// Total sorter runs made.
        attempts_run: usize,
    },
}

/// A successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<S> {
    /// The first step at which a run succeeded.
    pub time_step: Duration,
    /// Total sorter runs made, including the successful one.
    pub attempts_run: usize,
    /// The source of the winning run, holding its sorted output.
    pub source: S,
}

/// Doubling search over time-scales.
#[derive(Debug, Clone)]
pub struct TimeStepSearch {
    min: Duration,
    max: Duration,
    attempts: usize,
    config: SorterConfig,
}

impl TimeStepSearch {
    /// Concurrent sorters tried per step by default.
    pub const DEFAULT_ATTEMPTS: usize = 5;

    /// Searches steps `min, 2·min, 4·min, …` below `max`.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            attempts: Self::DEFAULT_ATTEMPTS,
            config: SorterConfig::default(),
        }
    }

    /// Sets how many sorters race at each step. Zero is treated as one.
    #[must_use]
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Sets the thread configuration for every sorter. Its `time_step` is
    /// replaced by the step under test.
    #[must_use]
    pub fn with_config(mut self, config: SorterConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the number of sorters raced per step.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Runs the search. `factory` builds a fresh source for every attempt.
    ///
    /// # Errors
    ///
    /// [`SearchError::InvalidRange`] if `min` is zero or not below `max`;
    /// [`SearchError::Exhausted`] if no step succeeded.
    pub fn find<S, F>(&self, mut factory: F) -> Result<SearchOutcome<S>, SearchError>
    where
        S: ValueSource + Send,
        F: FnMut() -> S,
    {
        self.search(|step| self.race(step, &mut factory))
    }

    fn search<S>(
        &self,
        mut try_step: impl FnMut(Duration) -> Option<S>,
    ) -> Result<SearchOutcome<S>, SearchError> {
        if self.min.is_zero() || self.min >= self.max {
            return Err(SearchError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        let mut attempts_run = 0;
        let mut step = self.min;
        while step < self.max {
            info!(?step, attempts = self.attempts, "trying time step");
            attempts_run += self.attempts;
            if let Some(source) = try_step(step) {
                info!(?step, attempts_run, "time step found");
                return Ok(SearchOutcome {
                    time_step: step,
                    attempts_run,
                    source,
                });
            }
            let Some(next) = step.checked_mul(2) else {
                break;
            };
            step = next;
        }
        Err(SearchError::Exhausted {
            max: self.max,
            attempts_run,
        })
    }

    /// Races `attempts` sorters at `step`. The first to succeed kills the rest.
    #[cfg_attr(not(feature = "tracing-integration"), allow(unused_variables))]
    fn race<S, F>(&self, step: Duration, factory: &mut F) -> Option<S>
    where
        S: ValueSource + Send,
        F: FnMut() -> S,
    {
        let config = self.config.clone().with_time_step(step);
        let mut sorters: Vec<SleepSorter<S>> = (0..self.attempts)
            .map(|_| SleepSorter::with_config(factory(), config.clone()))
            .collect();
        let handles: Vec<KillHandle> = sorters.iter().map(SleepSorter::kill_handle).collect();

        let outcomes: Vec<bool> = thread::scope(|scope| {
            let runs: Vec<_> = sorters
                .iter_mut()
                .enumerate()
                .map(|(attempt, sorter)| {
                    let handles = &handles;
                    scope.spawn(move || {
                        let result = sorter.run();
                        match &result {
                            Ok(()) => {
                                for (other, handle) in handles.iter().enumerate() {
                                    if other != attempt {
                                        handle.kill();
                                    }
                                }
                            }
                            Err(err) => debug!(attempt, ?step, error = %err, "attempt failed"),
                        }
                        result.is_ok()
                    })
                })
                .collect();
            runs.into_iter()
                .map(|run| match run.join() {
                    Ok(succeeded) => succeeded,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        sorters
            .into_iter()
            .zip(outcomes)
            .find_map(|(sorter, succeeded)| succeeded.then(|| sorter.into_source()))
    }
}
