//! Utilities for the sorter.
//!
//! [`DetRng`] generates input from an explicit seed, so any generated run can
//! be reproduced.

pub mod det_rng;

pub use det_rng::{DetRng, seed_from_time};
