//! Shared helpers for integration tests.

#![allow(dead_code)]

use sleepsort::{ArraySource, SleepSorter, SortError};
use std::time::Duration;

/// Initializes logging and records which test is running.
pub fn init_test(name: &str) {
    sleepsort::test_logging::init_test(name);
}

/// Sorts `values` at `time_step` and returns the sorter's output.
pub fn sleep_sort(values: Vec<u64>, time_step: Duration) -> Result<Vec<u64>, SortError> {
    let mut sorter = SleepSorter::new(ArraySource::new(values), time_step);
    sorter.run()?;
    Ok(sorter.into_source().into_inner())
}

/// Initializes logging without recording a test name.
pub fn init_test_logging() {
    sleepsort::test_logging::init_test_logging();
}

/// Returns true if `values` never decreases.
pub fn is_non_decreasing(values: &[u64]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}
