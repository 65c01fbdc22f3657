//! Recorder lifecycle state machine.
//!
//! Pure event-in/action-out core of a dictation session. The machine owns
//! the phase, the pending payload, the per-session cancellation mark, and
//! the submission correlation id; it never performs I/O. The session
//! driver executes the returned [`RecorderAction`]s and feeds the results
//! back as further [`RecorderEvent`]s.

use crate::RecorderPhase;

use dicta_core::AudioPayload;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum RecorderEvent {
    /// The user asked to start recording.
    StartRequested,
    /// The capture layer reported progress for the active session.
    Progress {
        /// Milliseconds of audio captured so far.
        elapsed_ms: u64,
    },
    /// The user asked to stop and submit.
    StopRequested,
    /// The user asked to cancel the current capture or error.
    CancelRequested,
    /// The user asked to discard everything and return to idle.
    ResetRequested,
    /// The user asked to resubmit the preserved payload.
    RetryRequested,
    /// Capture could not be started or finalized.
    CaptureFailed {
        /// User-facing failure message.
        message: String,
    },
    /// Capture finalization produced a payload.
    CaptureFinalized {
        /// The finalized audio, not yet submitted.
        payload: AudioPayload,
    },
    /// A submission finished, successfully or not.
    SubmissionResolved {
        /// Correlation id issued when the submission was dispatched.
        request_id: Uuid,
        /// Transcribed text, or the user-facing failure message.
        result: Result<String, String>,
    },
}

/// Side effect for the session driver to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderAction {
    /// Acquire the microphone and begin capture.
    StartCapture,
    /// Finalize the active capture into a payload.
    FinalizeCapture,
    /// Stop the active capture and discard its audio.
    DiscardCapture,
    /// Submit a payload for transcription.
    Submit {
        /// Correlation id; responses carrying any other id are stale.
        request_id: Uuid,
        /// The payload to submit.
        payload: AudioPayload,
    },
    /// Hand the transcribed text to the composer.
    AdoptTranscript {
        /// The transcription result.
        text: String,
    },
}

/// The dictation lifecycle state machine.
///
/// Invariants maintained across every event sequence:
/// - the phase is always exactly one of the four variants;
/// - a pending payload exists iff the phase is `Processing` or an `Error`
///   with retry available;
/// - the cancellation mark never survives into a new recording, and is
///   consumed exactly once, at capture finalization.
pub struct RecorderMachine {
    session_id: Uuid,
    phase: RecorderPhase,
    pending_audio: Option<AudioPayload>,
    /// Set by cancel while a capture is live or finalizing; checked and
    /// cleared when the finalized payload (or its failure) arrives.
    cancelled: bool,
    /// Correlation id of the in-flight submission, if any.
    active_request: Option<Uuid>,
}

impl RecorderMachine {
    /// Create a machine in `Idle` for the given composer session.
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            phase: RecorderPhase::Idle,
            pending_audio: None,
            cancelled: false,
            active_request: None,
        }
    }

    /// Current phase, as published to subscribers.
    pub fn phase(&self) -> &RecorderPhase {
        &self.phase
    }

    /// Payload retained for retry, if any.
    pub fn pending_audio(&self) -> Option<&AudioPayload> {
        self.pending_audio.as_ref()
    }

    /// Apply one event, returning the side effect the driver must run.
    pub fn apply(&mut self, event: RecorderEvent) -> Option<RecorderAction> {
        match event {
            RecorderEvent::StartRequested => self.on_start(),
            RecorderEvent::Progress { elapsed_ms } => self.on_progress(elapsed_ms),
            RecorderEvent::StopRequested => self.on_stop(),
            RecorderEvent::CancelRequested | RecorderEvent::ResetRequested => self.on_cancel(),
            RecorderEvent::RetryRequested => self.on_retry(),
            RecorderEvent::CaptureFailed { message } => self.on_capture_failed(message),
            RecorderEvent::CaptureFinalized { payload } => self.on_capture_finalized(payload),
            RecorderEvent::SubmissionResolved { request_id, result } => {
                self.on_submission_resolved(request_id, result)
            }
        }
    }

    fn on_start(&mut self) -> Option<RecorderAction> {
        if !matches!(self.phase, RecorderPhase::Idle) {
            warn!(session_id = %self.session_id, phase = ?self.phase, "Start ignored outside Idle");
            return None;
        }

        // Fresh session: no stale cancellation mark, no leftover payload
        self.cancelled = false;
        self.pending_audio = None;
        self.active_request = None;
        self.phase = RecorderPhase::Recording { elapsed_ms: 0 };

        info!(session_id = %self.session_id, "Recording starting");

        Some(RecorderAction::StartCapture)
    }

    fn on_progress(&mut self, reported_ms: u64) -> Option<RecorderAction> {
        if let RecorderPhase::Recording { elapsed_ms } = &mut self.phase {
            // Monotonic: a tick sampled before a newer one was applied can
            // never move the display backwards
            *elapsed_ms = (*elapsed_ms).max(reported_ms);
        }
        None
    }

    fn on_stop(&mut self) -> Option<RecorderAction> {
        if !self.phase.is_recording() {
            debug!(session_id = %self.session_id, phase = ?self.phase, "Stop is a no-op");
            return None;
        }

        self.phase = RecorderPhase::Processing;

        info!(session_id = %self.session_id, "Recording stopped, finalizing capture");

        Some(RecorderAction::FinalizeCapture)
    }

    fn on_cancel(&mut self) -> Option<RecorderAction> {
        match self.phase {
            RecorderPhase::Recording { .. } => {
                // No finalization will follow; discard the live capture now
                self.cancelled = false;
                self.phase = RecorderPhase::Idle;
                self.pending_audio = None;

                info!(session_id = %self.session_id, "Recording cancelled");

                Some(RecorderAction::DiscardCapture)
            }
            RecorderPhase::Processing if self.active_request.is_none() => {
                // Stop already requested, finalization still in flight: mark
                // the session so the eventual payload is discarded
                self.cancelled = true;
                self.phase = RecorderPhase::Idle;
                self.pending_audio = None;

                info!(session_id = %self.session_id, "Cancelled before finalization");

                None
            }
            RecorderPhase::Error { .. } => {
                self.pending_audio = None;
                self.active_request = None;
                self.cancelled = false;
                self.phase = RecorderPhase::Idle;

                info!(session_id = %self.session_id, "Error dismissed");

                None
            }
            _ => {
                debug!(session_id = %self.session_id, phase = ?self.phase, "Cancel is a no-op");
                None
            }
        }
    }

    fn on_retry(&mut self) -> Option<RecorderAction> {
        if !matches!(self.phase, RecorderPhase::Error { .. }) {
            debug!(session_id = %self.session_id, phase = ?self.phase, "Retry ignored outside Error");
            return None;
        }

        let Some(payload) = self.pending_audio.clone() else {
            warn!(session_id = %self.session_id, "Retry requested with no preserved payload");
            return None;
        };

        let request_id = Uuid::new_v4();
        self.active_request = Some(request_id);
        self.phase = RecorderPhase::Processing;

        info!(session_id = %self.session_id, request_id = %request_id, "Retrying submission");

        Some(RecorderAction::Submit {
            request_id,
            payload,
        })
    }

    fn on_capture_failed(&mut self, message: String) -> Option<RecorderAction> {
        if self.cancelled {
            // The user already walked away from this capture; its failure
            // is not worth surfacing
            self.cancelled = false;
            self.phase = RecorderPhase::Idle;

            debug!(session_id = %self.session_id, message = %message, "Capture failure after cancel");

            return None;
        }

        warn!(session_id = %self.session_id, message = %message, "Capture failed");

        self.phase = RecorderPhase::Error {
            message,
            can_retry: false,
        };

        None
    }

    fn on_capture_finalized(&mut self, payload: AudioPayload) -> Option<RecorderAction> {
        if self.cancelled {
            // Consume the mark exactly once; a later, unrelated recording
            // must never see it
            self.cancelled = false;
            self.phase = RecorderPhase::Idle;
            self.pending_audio = None;

            info!(session_id = %self.session_id, "Finalized payload discarded after cancel");

            return None;
        }

        if !self.phase.is_processing() {
            warn!(session_id = %self.session_id, phase = ?self.phase, "Unexpected capture finalization");
            return None;
        }

        let request_id = Uuid::new_v4();
        self.pending_audio = Some(payload.clone());
        self.active_request = Some(request_id);

        info!(
            session_id = %self.session_id,
            request_id = %request_id,
            byte_len = payload.len(),
            duration_ms = payload.duration_ms(),
            "Submitting captured audio"
        );

        Some(RecorderAction::Submit {
            request_id,
            payload,
        })
    }

    fn on_submission_resolved(
        &mut self,
        request_id: Uuid,
        result: Result<String, String>,
    ) -> Option<RecorderAction> {
        if self.active_request != Some(request_id) {
            // A superseded request resolved after the session moved on
            debug!(session_id = %self.session_id, request_id = %request_id, "Stale submission response dropped");
            return None;
        }

        self.active_request = None;

        match result {
            Ok(text) => {
                self.pending_audio = None;
                self.phase = RecorderPhase::Idle;

                info!(session_id = %self.session_id, text_len = text.len(), "Transcription adopted");

                Some(RecorderAction::AdoptTranscript { text })
            }
            Err(message) => {
                warn!(session_id = %self.session_id, message = %message, "Submission failed");

                // Payload stays pending so the user can retry without
                // re-recording
                self.phase = RecorderPhase::Error {
                    message,
                    can_retry: self.pending_audio.is_some(),
                };

                None
            }
        }
    }
}
