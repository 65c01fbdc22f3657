//! Exclusive microphone lease shared by all dictation sessions.
//!
//! Replaces a process-wide "microphone in use" boolean with an owner
//! object granting at most one lease at a time. Release is tied to guard
//! drop, so every exit path — stop, cancel, error, session teardown —
//! releases deterministically.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, info};
use uuid::Uuid;

/// Cloneable handle to the single microphone lease.
#[derive(Debug, Clone, Default)]
pub struct MicrophoneLease {
    held: Arc<AtomicBool>,
}

impl MicrophoneLease {
    /// Create the lease owner. One per process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to acquire the lease for a session.
    ///
    /// All-or-nothing: returns `None` immediately when another session
    /// holds it, never blocks or queues.
    pub fn try_acquire(&self, session_id: Uuid) -> Option<MicGuard> {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(session_id = %session_id, "Microphone lease unavailable");
            return None;
        }

        info!(session_id = %session_id, "Microphone lease acquired");

        Some(MicGuard {
            held: Arc::clone(&self.held),
            session_id,
        })
    }

    /// Whether any session currently holds the lease.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Exclusive right to use the microphone. Dropping it releases the lease.
#[derive(Debug)]
pub struct MicGuard {
    held: Arc<AtomicBool>,
    session_id: Uuid,
}

impl Drop for MicGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        info!(session_id = %self.session_id, "Microphone lease released");
    }
}
