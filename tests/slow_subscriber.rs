//! Sorting with a subscriber whose writes are slow.
//!
//! Runs in its own test binary because it installs a global subscriber.

#![cfg(feature = "tracing-integration")]

use sleepsort::{ArraySource, SleepSorter};
use std::io;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct SlowWriter;

impl io::Write for SlowWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        thread::sleep(Duration::from_millis(30));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn slow_log_writes_do_not_reorder_close_values() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("sleepsort=trace"))
        .with_writer(|| SlowWriter)
        .init();

    for values in [vec![2, 1], vec![1, 2], vec![3, 1, 2]] {
        let mut sorter = SleepSorter::new(ArraySource::new(values), Duration::from_millis(5));
        sorter.run().unwrap();
        let sorted = sorter.into_source().into_inner();
        assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]), "{sorted:?}");
    }
}
