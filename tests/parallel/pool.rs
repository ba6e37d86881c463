// Integration tests for src/parallel/pool.rs — WorkerPool.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lz4chain::parallel::WorkerPool;
use lz4chain::Error;

#[test]
fn reports_its_shape() {
    let pool = WorkerPool::new(3, 6).unwrap();
    assert_eq!(pool.workers(), 3);
    assert_eq!(pool.queue_depth(), 6);
    assert_eq!(pool.idle_slots(), 6);
}

#[test]
fn zero_workers_unavailable() {
    assert!(matches!(WorkerPool::new(0, 1), Err(Error::DispatcherUnavailable(_))));
}

#[test]
fn slots_return_after_run() {
    let pool = WorkerPool::new(2, 4).unwrap();
    let out = pool.run_ordered((0..20).map(|i| move || i + 1)).unwrap();
    assert_eq!(out.len(), 20);
    assert_eq!(pool.idle_slots(), 4);
}

#[test]
fn ordered_results_from_borrowed_input() {
    let data: Vec<u32> = (0..1000).collect();
    let pool = WorkerPool::new(4, 8).unwrap();
    let jobs = data.chunks(100).map(|c| move || c.iter().sum::<u32>());
    let sums: Vec<u32> = pool
        .run_ordered(jobs)
        .unwrap()
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    let expected: Vec<u32> = data.chunks(100).map(|c| c.iter().sum()).collect();
    assert_eq!(sums, expected);
}

#[test]
fn never_more_than_queue_depth_in_flight() {
    let pool = WorkerPool::new(4, 2).unwrap();
    let active = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let jobs = (0..16).map(|_| {
        let active = &active;
        let peak = &peak;
        move || {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(2));
            active.fetch_sub(1, Ordering::SeqCst);
        }
    });
    pool.run_ordered(jobs).unwrap();
    assert!(peak.load(Ordering::SeqCst) <= 2);
}

#[test]
fn panicking_job_reported_in_its_slot() {
    let pool = WorkerPool::new(2, 4).unwrap();
    let jobs = (0..6usize).map(|i| {
        move || {
            if i == 3 {
                panic!("job {i} failed");
            }
            i
        }
    });
    let results = pool.run_ordered(jobs).unwrap();
    for (i, r) in results.into_iter().enumerate() {
        if i == 3 {
            assert!(r.is_err());
        } else {
            assert_eq!(r.unwrap(), i);
        }
    }
    // the pool is still usable
    assert_eq!(pool.run_ordered([|| 7]).unwrap().len(), 1);
}
