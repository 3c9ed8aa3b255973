//! Time-scale arithmetic for sort tasks.
//!
//! A task holding value `v` sleeps for `v × time_step`. These helpers keep that
//! product saturating instead of overflowing, and parse the human-readable
//! durations accepted by the configuration layer and the CLI.

mod parse;

pub use parse::{DurationParseError, parse_duration};

use std::time::Duration;

/// Converts a duration to whole nanoseconds, saturating at `u64::MAX`.
#[inline]
#[must_use]
pub fn duration_to_nanos_saturating(duration: Duration) -> u64 {
    duration.as_nanos().min(u128::from(u64::MAX)) as u64
}

/// Returns the sleep duration for a task carrying `value`.
///
/// The product saturates at `u64::MAX` nanoseconds (a little over 584 years),
/// which is indistinguishable from "never" for a sort run.
#[must_use]
pub fn scaled_delay(value: u64, time_step: Duration) -> Duration {
    let nanos = time_step.as_nanos().saturating_mul(u128::from(value));
    Duration::from_nanos(nanos.min(u128::from(u64::MAX)) as u64)
}

/// Returns `2^exponent` nanoseconds, saturating at `u64::MAX` nanoseconds.
#[must_use]
pub fn exponent_step(exponent: u32) -> Duration {
    Duration::from_nanos(1u64.checked_shl(exponent).unwrap_or(u64::MAX))
}
