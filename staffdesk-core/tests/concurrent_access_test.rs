//! Concurrent storage access tests
//!
//! Several `sd` processes may write the same data directory at once. Each
//! thread here opens its own `FileKeyValueStore`, the way separate processes
//! would, and the slot must always hold one complete value.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use tempfile::TempDir;

use staffdesk_core::adapters::FileKeyValueStore;
use staffdesk_core::ports::KeyValueStore;

/// Number of concurrent writers.
/// Realistic upper bound: a couple of terminals running commands together.
const THREAD_COUNT: usize = 6;

/// Writes per thread
const ITERATIONS_PER_THREAD: usize = 10;

/// Distinctive payload per writer, large enough that a torn write would show
fn payload(thread_id: usize, iteration: usize) -> String {
    let marker = format!("t{thread_id}i{iteration};");
    marker.repeat(4096 / marker.len())
}

#[test]
fn test_concurrent_writers_never_tear_a_slot() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().join("storage"));

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            let success_count = Arc::clone(&success_count);

            thread::spawn(move || {
                let store = FileKeyValueStore::new(&dir).unwrap();
                barrier.wait();

                for i in 0..ITERATIONS_PER_THREAD {
                    store.set("ipt_demo_v1", &payload(thread_id, i)).unwrap();
                    success_count.fetch_add(1, Ordering::SeqCst);

                    let read = store.get("ipt_demo_v1").unwrap().unwrap();
                    let first = read.split(';').next().unwrap().to_string();
                    assert!(
                        read.split(';').filter(|s| !s.is_empty()).all(|s| s == first),
                        "torn value observed"
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer panicked");
    }

    assert_eq!(
        success_count.load(Ordering::SeqCst),
        THREAD_COUNT * ITERATIONS_PER_THREAD
    );

    // Only the slot and the lock file remain; no temp files left behind
    let mut names: Vec<String> = std::fs::read_dir(dir.as_path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec![".lock".to_string(), "ipt_demo_v1".to_string()]);
}

#[test]
fn test_concurrent_quota_checks_hold() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().join("storage"));
    let limit = 1000u64;

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let dir = Arc::clone(&dir);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let store = FileKeyValueStore::new(&dir).unwrap().with_quota(Some(limit));
                barrier.wait();
                // Each slot is 300 bytes; at most three fit
                let _ = store.set(&format!("slot_{thread_id}"), &"x".repeat(300));
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer panicked");
    }

    let total: u64 = std::fs::read_dir(dir.as_path())
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_name().to_string_lossy().starts_with("slot_"))
        .map(|e| e.metadata().unwrap().len())
        .sum();
    assert!(total <= limit, "quota exceeded: {total} > {limit}");
    assert_eq!(total, 900);
}
