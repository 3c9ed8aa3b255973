use super::{ArraySource, ValueSource, exhausted};
use crate::util::DetRng;

/// A [`ValueSource`] that generates `size` values uniformly in `[0, max)`.
///
/// Values are produced lazily, one per [`next_value`](ValueSource::next_value)
/// call. There is no backing storage: [`set_next`](ValueSource::set_next) only
/// advances the cursor, so sorted output written by a run is discarded. Use
/// [`to_array_source`](Self::to_array_source) to sort generated values in
/// place instead.
///
/// [`reset`](ValueSource::reset) rewinds the generator to its starting state, so
/// every pass over the source yields the same sequence.
#[derive(Debug, Clone)]
pub struct BoundedRandomSource {
    rng: DetRng,
    origin: DetRng,
    seed: Option<u64>,
    size: usize,
    max: u64,
    index: usize,
}

impl BoundedRandomSource {
    /// Creates a source that draws from `rng`.
    ///
    /// The generator's current state is remembered, and every
    /// [`reset`](ValueSource::reset) rewinds to it.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero: the range `[0, 0)` is empty.
    #[must_use]
    pub fn new(size: usize, max: u64, rng: DetRng) -> Self {
        assert!(max > 0, "BoundedRandomSource requires max > 0");
        Self {
            origin: rng.clone(),
            rng,
            seed: None,
            size,
            max,
            index: 0,
        }
    }

    /// Creates a source from a seed.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    #[must_use]
    pub fn with_seed(size: usize, max: u64, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(size, max, DetRng::new(seed))
        }
    }

    /// Creates a source seeded from the wall clock.
    ///
    /// # Panics
    ///
    /// Panics if `max` is zero.
    #[must_use]
    pub fn from_time(size: usize, max: u64) -> Self {
        Self::with_seed(size, max, crate::util::seed_from_time())
    }

    /// Returns the seed, for reproducing a run.
    ///
    /// `None` when the source was built from an existing generator.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the number of values one pass produces.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the exclusive upper bound of generated values.
    #[must_use]
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Materializes one full pass into an [`ArraySource`].
    ///
    /// Both sources are left with their cursors at the start.
    #[must_use]
    pub fn to_array_source(&mut self) -> ArraySource<Vec<u64>> {
        self.reset();
        let mut values = Vec::with_capacity(self.size);
        while self.num_left() > 0 {
            values.push(self.next_value());
        }
        self.reset();
        ArraySource::new(values)
    }
}

impl ValueSource for BoundedRandomSource {
    fn next_value(&mut self) -> u64 {
        if self.num_left() == 0 {
            exhausted("next_value");
        }
        self.index += 1;
        self.rng.next_below(self.max)
    }

    fn set_next(&mut self, _value: u64) {
        self.index += 1;
    }

    fn num_left(&self) -> usize {
        self.size.saturating_sub(self.index)
    }

    fn reset(&mut self) {
        self.index = 0;
        self.rng = self.origin.clone();
    }
}
