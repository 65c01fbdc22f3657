use crate::MicrophoneLease;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

/// WHAT: Two sessions racing for the microphone get exactly one lease
/// WHY: Concurrent composers must never share the capture device
#[test]
#[allow(clippy::unwrap_used)]
fn given_two_concurrent_sessions_when_acquiring_then_exactly_one_wins() {
    // Given: One shared lease and two racing threads
    let lease = MicrophoneLease::new();
    let acquired = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    // When: Both try to acquire at the same time
    for _ in 0..2 {
        let lease = lease.clone();
        let acquired = Arc::clone(&acquired);
        handles.push(std::thread::spawn(move || {
            let guard = lease.try_acquire(Uuid::new_v4());
            if guard.is_some() {
                acquired.fetch_add(1, Ordering::AcqRel);
                // Hold briefly so the loser observes contention
                std::thread::sleep(std::time::Duration::from_millis(20));
            }
            guard.is_some()
        }));
    }
    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    // Then: Exactly one acquisition succeeded, the other failed fast
    assert_eq!(acquired.load(Ordering::Acquire), 1);
    assert_eq!(results.iter().filter(|&&won| won).count(), 1);
}

/// WHAT: Dropping the guard releases the lease for the next session
/// WHY: Release must be deterministic on every exit path
#[test]
fn given_held_lease_when_guard_dropped_then_next_acquire_succeeds() {
    // Given: A lease held by one session
    let lease = MicrophoneLease::new();
    let guard = lease.try_acquire(Uuid::new_v4());
    assert!(guard.is_some());
    assert!(lease.is_held());
    assert!(lease.try_acquire(Uuid::new_v4()).is_none());

    // When: The holder's guard is dropped
    drop(guard);

    // Then: The lease is free and another session can take it
    assert!(!lease.is_held());
    assert!(lease.try_acquire(Uuid::new_v4()).is_some());
}

/// WHAT: A panicking holder still releases the lease
/// WHY: Drop-based release covers unwinds, not just happy paths
#[test]
#[allow(clippy::panic)]
fn given_panicking_holder_when_unwinding_then_lease_released() {
    // Given: A lease acquired inside a thread that panics
    let lease = MicrophoneLease::new();
    let lease_clone = lease.clone();

    let _ = std::thread::spawn(move || {
        let _guard = lease_clone.try_acquire(Uuid::new_v4());
        panic!("intentional panic while holding the lease");
    })
    .join();

    // When/Then: The lease is free after the unwind
    assert!(!lease.is_held());
    assert!(lease.try_acquire(Uuid::new_v4()).is_some());
}
