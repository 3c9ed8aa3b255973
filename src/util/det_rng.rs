//! Deterministic pseudo-random number generator.
//!
//! Generated input must be reproducible from its seed, so every generator is
//! an explicitly owned value. There is no process-wide random state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Distinguishes seeds drawn within the same clock tick.
static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Derives a seed from the wall clock.
///
/// Two calls never return the same seed within one process, even when the
/// clock has not advanced between them.
#[must_use]
pub fn seed_from_time() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| crate::time::duration_to_nanos_saturating(elapsed));
    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    DetRng::mix_seed(nanos ^ counter.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

/// A small xorshift64* generator.
///
/// Not cryptographically secure. The state is never zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetRng {
    state: u64,
}

impl DetRng {
    /// Replaces an all-zero mixed seed, which xorshift cannot leave.
    const ZERO_SEED_FALLBACK: u64 = 0x853c_49e6_748f_ea9b;

    /// Creates a generator from a seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        let mixed = Self::mix_seed(seed);
        Self {
            state: if mixed == 0 {
                Self::ZERO_SEED_FALLBACK
            } else {
                mixed
            },
        }
    }

    const fn mix_seed(mut seed: u64) -> u64 {
        seed ^= seed >> 30;
        seed = seed.wrapping_mul(0xbf58_476d_1ce4_e5b9);
        seed ^= seed >> 27;
        seed = seed.wrapping_mul(0x94d0_49bb_1331_11eb);
        seed ^= seed >> 31;
        seed
    }

    /// Returns the next random `u64`.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    /// Returns a value uniformly distributed in `[0, bound)`.
    ///
    /// Uses a widening multiply and rejects the biased low zone, so every
    /// value in range is equally likely.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "next_below requires a non-zero bound");
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let wide = u128::from(self.next_u64()) * u128::from(bound);
            if (wide as u64) >= threshold {
                return (wide >> 64) as u64;
            }
        }
    }
}
