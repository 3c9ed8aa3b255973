//! The consumer loop: drains results into the source and checks their order.

use crate::error::SortError;
use crate::source::ValueSource;
use crate::sync::{CancelSignal, RecvError, ResultReceiver};
use crate::tracing_compat::warn;
use crate::types::CancelReason;

/// Writes `expected` values from `results` into `source` in arrival order.
///
/// Returns the number written. A value smaller than one already written is
/// still written, then cancels the run.
pub(super) fn collect<S: ValueSource>(
    results: &ResultReceiver,
    source: &mut S,
    signal: &CancelSignal,
    expected: usize,
) -> Result<usize, SortError> {
    let mut written = 0;
    let mut previous: Option<u64> = None;
    while written < expected {
        let value = match results.recv() {
            Ok(value) => value,
            Err(RecvError::Cancelled) => {
                return Err(SortError::Killed {
                    reason: signal.reason().unwrap_or_default(),
                });
            }
        };
        source.set_next(value);
        written += 1;
        if let Some(previous) = previous
            && value < previous
        {
            warn!(value, previous, written, "ordering violation");
            signal.cancel(CancelReason::order_violation());
            return Err(SortError::UnsortedOutput { value, previous });
        }
        previous = Some(value);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::source::ArraySource;
    use crate::sync::result_channel;
    use crate::test_logging::init_test;
    use crate::types::CancelKind;
    use std::sync::Arc;

    #[test]
    fn accepts_non_decreasing_arrivals() {
        init_test("accepts_non_decreasing_arrivals");
        let signal = Arc::new(CancelSignal::new());
        let (tx, rx) = result_channel(4, &signal);
        for v in [1, 1, 2, 5] {
            tx.send(v).unwrap();
        }
        let mut source = ArraySource::new(vec![0; 4]);
        assert_eq!(collect(&rx, &mut source, &signal, 4).unwrap(), 4);
        assert_eq!(source.as_slice(), &[1, 1, 2, 5]);
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn decreasing_pair_cancels_the_run() {
        init_test("decreasing_pair_cancels_the_run");
        let signal = Arc::new(CancelSignal::new());
        let (tx, rx) = result_channel(3, &signal);
        for v in [1, 3, 2] {
            tx.send(v).unwrap();
        }
        let mut source = ArraySource::new(vec![0; 3]);
        let err = collect(&rx, &mut source, &signal, 3).unwrap_err();
        assert!(matches!(
            err,
            SortError::UnsortedOutput {
                value: 2,
                previous: 3
            }
        ));
        assert_eq!(source.as_slice(), &[1, 3, 2]);
        assert_eq!(
            signal.reason().map(|r| r.kind()),
            Some(CancelKind::OrderViolation)
        );
    }

    #[test]
    fn nothing_is_written_after_cancellation() {
        init_test("nothing_is_written_after_cancellation");
        let signal = Arc::new(CancelSignal::new());
        let (tx, rx) = result_channel(2, &signal);
        tx.send(4).unwrap();
        signal.cancel(CancelReason::user("stop"));
        let mut source = ArraySource::new(vec![0; 2]);
        let err = collect(&rx, &mut source, &signal, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProcessingKilled);
        assert_eq!(source.as_slice(), &[0, 0]);
    }

    #[test]
    fn cancellation_while_parked_wakes_the_consumer() {
        init_test("cancellation_while_parked_wakes_the_consumer");
        let signal = Arc::new(CancelSignal::new());
        let (_tx, rx) = result_channel(1, &signal);
        let mut source = ArraySource::new(vec![0]);
        let canceller = Arc::clone(&signal);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(20));
            canceller.cancel(CancelReason::user("late"));
        });
        let err = collect(&rx, &mut source, &signal, 1).unwrap_err();
        handle.join().unwrap();
        match err {
            SortError::Killed { reason } => assert_eq!(reason, CancelReason::user("late")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
