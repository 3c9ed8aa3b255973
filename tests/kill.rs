//! Cancellation of in-flight and pending runs.

mod common;

use common::init_test;
use sleepsort::{
    ArraySource, BoundedRandomSource, CancelKind, ErrorKind, SleepSorter, SortError, SorterState,
};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn kill_right_after_run_starts_reports_processing_killed() {
    init_test("kill_right_after_run_starts_reports_processing_killed");
    let mut sorter = SleepSorter::new(
        BoundedRandomSource::with_seed(256, 1 << 20, 1),
        Duration::from_secs(1),
    );
    let handle = sorter.kill_handle();
    let killer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(5));
        handle.kill();
    });
    let started = Instant::now();
    let err = sorter.run().unwrap_err();
    killer.join().unwrap();

    assert_eq!(err.kind(), ErrorKind::ProcessingKilled);
    assert_eq!(sorter.state(), SorterState::Killed);
    assert!(started.elapsed() < Duration::from_secs(30));
}

#[test]
fn concurrent_kills_are_idempotent() {
    init_test("concurrent_kills_are_idempotent");
    let mut sorter = SleepSorter::new(ArraySource::new(vec![1_000; 8]), Duration::from_secs(1));
    let handle = sorter.kill_handle();
    let killers: Vec<_> = (0..8)
        .map(|_| {
            let handle = handle.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(10));
                for _ in 0..100 {
                    handle.kill();
                }
            })
        })
        .collect();
    let err = sorter.run().unwrap_err();
    for killer in killers {
        killer.join().unwrap();
    }
    match err {
        SortError::Killed { reason } => assert_eq!(reason.kind(), CancelKind::User),
        other => panic!("unexpected error: {other}"),
    }
    // The input values were never overwritten.
    assert_eq!(sorter.source().as_slice(), &[1_000; 8]);
}

#[test]
fn kill_before_run_spawns_nothing() {
    init_test("kill_before_run_spawns_nothing");
    let mut sorter = SleepSorter::new(ArraySource::new(vec![3, 2, 1]), Duration::from_secs(100));
    sorter.kill();
    let started = Instant::now();
    assert!(sorter.run().unwrap_err().is_killed());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn kill_after_completion_is_harmless() {
    init_test("kill_after_completion_is_harmless");
    let mut sorter = SleepSorter::new(ArraySource::new(vec![2, 1]), Duration::from_millis(5));
    sorter.run().unwrap();
    sorter.kill();
    sorter.kill();
    assert_eq!(sorter.state(), SorterState::Completed);
    assert_eq!(sorter.source().as_slice(), &[1, 2]);
}

#[test]
fn partial_output_stops_at_cancellation() {
    init_test("partial_output_stops_at_cancellation");
    // The zeros arrive at once; the large value would take an hour.
    let mut sorter = SleepSorter::new(ArraySource::new(vec![0, 3_600, 0]), Duration::from_secs(1));
    let handle = sorter.kill_handle();
    let killer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        handle.kill();
    });
    assert!(sorter.run().unwrap_err().is_killed());
    killer.join().unwrap();
    assert_eq!(sorter.source().as_slice(), &[0, 0, 0]);
}
