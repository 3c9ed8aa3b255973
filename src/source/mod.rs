//! Value sources: finite, resettable, cursor-driven integer sequences.
//!
//! A sort run reads every value through [`ValueSource::next_value`] to spawn
//! its tasks, rewinds with [`ValueSource::reset`], and then writes the values
//! back in arrival order through [`ValueSource::set_next`].
//!
//! Two sources are provided:
//!
//! - [`ArraySource`]: wraps mutable storage, so a run sorts it in place
//! - [`BoundedRandomSource`]: lazily generates bounded random values from an
//!   explicitly seeded [`DetRng`](crate::util::DetRng); writes only advance
//!   the cursor

mod array;
mod random;

pub use array::ArraySource;
pub use random::BoundedRandomSource;

/// A finite integer sequence with a shared read/write cursor.
///
/// # Contract
///
/// Callers must check [`num_left`](Self::num_left) before calling
/// [`next_value`](Self::next_value). Reading past the end is a bug in the
/// caller and panics; it is never reported as a recoverable error.
pub trait ValueSource {
    /// Returns the value at the cursor and advances it.
    ///
    /// # Panics
    ///
    /// Panics if `num_left() == 0`.
    fn next_value(&mut self) -> u64;

    /// Writes `value` at the cursor and advances it.
    fn set_next(&mut self, value: u64);

    /// Returns how many positions remain between the cursor and the end.
    fn num_left(&self) -> usize;

    /// Rewinds the cursor to the start.
    fn reset(&mut self);

    /// Returns true once the cursor has reached the end.
    fn is_exhausted(&self) -> bool {
        self.num_left() == 0
    }
}

impl<S: ValueSource + ?Sized> ValueSource for &mut S {
    fn next_value(&mut self) -> u64 {
        (**self).next_value()
    }

    fn set_next(&mut self, value: u64) {
        (**self).set_next(value);
    }

    fn num_left(&self) -> usize {
        (**self).num_left()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

impl<S: ValueSource + ?Sized> ValueSource for Box<S> {
    fn next_value(&mut self) -> u64 {
        (**self).next_value()
    }

    fn set_next(&mut self, value: u64) {
        (**self).set_next(value);
    }

    fn num_left(&self) -> usize {
        (**self).num_left()
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}

#[track_caller]
pub(crate) fn exhausted(op: &str) -> ! {
    panic!("improper call to {op}() with no values remaining")
}
