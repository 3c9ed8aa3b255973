use super::{ValueSource, exhausted};

/// A [`ValueSource`] over mutable storage.
///
/// Reads and writes share one cursor over the same slice, so a sort run leaves
/// the sorted values in the storage it was given. `B` is usually a `Vec<u64>`
/// or a borrowed `&mut [u64]`.
///
/// ```
/// use sleepsort::source::{ArraySource, ValueSource};
///
/// let mut values = [3, 1, 2];
/// let mut source = ArraySource::new(&mut values[..]);
/// assert_eq!(source.next_value(), 3);
/// source.reset();
/// source.set_next(9);
/// assert_eq!(values, [9, 1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySource<B = Vec<u64>> {
    values: B,
    index: usize,
}

impl<B: AsRef<[u64]> + AsMut<[u64]>> ArraySource<B> {
    /// Wraps `values` with the cursor at the start.
    #[must_use]
    pub fn new(values: B) -> Self {
        Self { values, index: 0 }
    }

    /// Returns the backing values.
    #[must_use]
    pub fn as_slice(&self) -> &[u64] {
        self.values.as_ref()
    }

    /// Returns the total number of values, regardless of the cursor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.as_ref().len()
    }

    /// Returns true if there are no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.as_ref().is_empty()
    }

    /// Unwraps the backing storage.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.values
    }
}

impl From<Vec<u64>> for ArraySource<Vec<u64>> {
    fn from(values: Vec<u64>) -> Self {
        Self::new(values)
    }
}

impl<B: AsRef<[u64]> + AsMut<[u64]>> ValueSource for ArraySource<B> {
    fn next_value(&mut self) -> u64 {
        if self.num_left() == 0 {
            exhausted("next_value");
        }
        let value = self.values.as_ref()[self.index];
        self.index += 1;
        value
    }

    fn set_next(&mut self, value: u64) {
        if self.num_left() == 0 {
            exhausted("set_next");
        }
        self.values.as_mut()[self.index] = value;
        self.index += 1;
    }

    fn num_left(&self) -> usize {
        self.len() - self.index
    }

    fn reset(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order_then_exhausts() {
        let mut source = ArraySource::new(vec![3, 1, 2]);
        assert_eq!(source.num_left(), 3);
        assert_eq!(source.next_value(), 3);
        assert_eq!(source.next_value(), 1);
        assert_eq!(source.next_value(), 2);
        assert!(source.is_exhausted());
    }

    #[test]
    fn writes_land_in_backing_storage() {
        let mut source = ArraySource::from(vec![0; 3]);
        for v in [7, 8, 9] {
            source.set_next(v);
        }
        assert_eq!(source.into_inner(), vec![7, 8, 9]);
    }

    #[test]
    fn reset_rewinds_without_touching_data() {
        let mut source = ArraySource::new(vec![5, 6]);
        source.next_value();
        source.reset();
        assert_eq!(source.num_left(), 2);
        assert_eq!(source.as_slice(), &[5, 6]);
    }

    #[test]
    fn borrowed_slice_is_sorted_in_place() {
        let mut values = [2, 1];
        {
            let mut source = ArraySource::new(&mut values[..]);
            source.set_next(1);
            source.set_next(2);
        }
        assert_eq!(values, [1, 2]);
    }

    #[test]
    fn empty_source_is_exhausted() {
        let source = ArraySource::new(Vec::<u64>::new());
        assert!(source.is_empty());
        assert!(source.is_exhausted());
    }

    #[test]
    #[should_panic(expected = "improper call to next_value()")]
    fn reading_past_end_panics() {
        let mut source = ArraySource::new(vec![1]);
        source.next_value();
        source.next_value();
    }

    #[test]
    #[should_panic(expected = "improper call to set_next()")]
    fn writing_past_end_panics() {
        let mut source = ArraySource::new(Vec::<u64>::new());
        source.set_next(1);
    }
}
