//! Per-composer dictation session driver.
//!
//! One session owns one [`RecorderMachine`] and drives its actions against
//! the capture adapter, the microphone lease, and the submission client.
//! Commands come in over an mpsc channel; the current [`RecorderPhase`] is
//! published on a watch channel for the UI to subscribe to, and adopted
//! transcripts are delivered on their own channel. All machine events flow
//! through one select loop, so progress ticks are applied in order and can
//! never be reordered relative to the stop or cancel that follows them.

use crate::{
    AppError, MicGuard, MicrophoneLease, RecorderPhase, SessionCommand, TranscriptionClient,
    machine::{RecorderAction, RecorderEvent, RecorderMachine},
};

use std::{panic::Location, sync::Arc, time::Duration};

use dicta_core::CaptureAdapter;
use error_location::ErrorLocation;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Sampling cadence for progress ticks while recording. The displayed
/// value itself comes from the capture layer, not from this timer.
const PROGRESS_TICK: Duration = Duration::from_millis(100);

/// Handle held by the UI layer for one composer.
pub struct SessionHandle {
    session_id: Uuid,
    command_tx: mpsc::Sender<SessionCommand>,
    phase_rx: watch::Receiver<RecorderPhase>,
}

impl SessionHandle {
    /// Opaque key identifying this composer instance.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Send a command to the session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ChannelSendFailed`] when the session task has
    /// already terminated.
    #[track_caller]
    pub async fn command(&self, command: SessionCommand) -> crate::AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", e.0, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Subscribe to phase changes.
    pub fn phase_rx(&self) -> watch::Receiver<RecorderPhase> {
        self.phase_rx.clone()
    }
}

/// One dictation session: state machine plus the resources it drives.
pub struct DictationSession {
    session_id: Uuid,
    machine: RecorderMachine,
    adapter: Option<CaptureAdapter>,
    lease: MicrophoneLease,
    guard: Option<MicGuard>,
    client: Arc<TranscriptionClient>,
    target_sample_rate: u32,
    command_rx: mpsc::Receiver<SessionCommand>,
    event_tx: mpsc::Sender<RecorderEvent>,
    event_rx: mpsc::Receiver<RecorderEvent>,
    phase_tx: watch::Sender<RecorderPhase>,
    transcript_tx: mpsc::Sender<String>,
}

impl DictationSession {
    /// Spawn a session task. Returns the handle the UI drives it with and
    /// the channel adopted transcripts arrive on.
    ///
    /// Sessions are independent: each gets its own state and channels, and
    /// only the microphone lease is shared between them.
    pub fn spawn(
        lease: MicrophoneLease,
        client: Arc<TranscriptionClient>,
        target_sample_rate: u32,
    ) -> (SessionHandle, mpsc::Receiver<String>) {
        let session_id = Uuid::new_v4();
        let (command_tx, command_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(32);
        let (phase_tx, phase_rx) = watch::channel(RecorderPhase::Idle);
        let (transcript_tx, transcript_rx) = mpsc::channel(8);

        let session = Self {
            session_id,
            machine: RecorderMachine::new(session_id),
            adapter: None,
            lease,
            guard: None,
            client,
            target_sample_rate,
            command_rx,
            event_tx,
            event_rx,
            phase_tx,
            transcript_tx,
        };

        tokio::spawn(session.run());

        let handle = SessionHandle {
            session_id,
            command_tx,
            phase_rx,
        };

        (handle, transcript_rx)
    }

    /// Run the session event loop until shutdown.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    async fn run(mut self) {
        info!("Dictation session started");

        let mut ticker = tokio::time::interval(PROGRESS_TICK);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    let Some(command) = command else {
                        info!("Command channel closed, shutting down session");
                        break;
                    };
                    let event = match command {
                        SessionCommand::Start => RecorderEvent::StartRequested,
                        SessionCommand::Stop => RecorderEvent::StopRequested,
                        SessionCommand::Cancel => RecorderEvent::CancelRequested,
                        SessionCommand::Retry => RecorderEvent::RetryRequested,
                        SessionCommand::Reset => RecorderEvent::ResetRequested,
                        SessionCommand::Shutdown => {
                            info!("Session shutdown requested");
                            break;
                        }
                    };
                    self.dispatch(event).await;
                }

                Some(event) = self.event_rx.recv() => {
                    self.dispatch(event).await;
                }

                _ = ticker.tick(), if self.machine.phase().is_recording() => {
                    if let Some(elapsed_ms) = self.adapter.as_ref().map(CaptureAdapter::captured_ms) {
                        self.dispatch(RecorderEvent::Progress { elapsed_ms }).await;
                    }
                }
            }
        }

        // Teardown releases the device and the shared lease synchronously,
        // whatever state the session was in
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.cancel();
        }
        self.guard.take();

        info!("Dictation session stopped");
    }

    /// Apply an event and execute whatever actions follow from it.
    ///
    /// Start and discard resolve synchronously and may produce a
    /// follow-up event (failure), applied in the same call. Finalization
    /// and submission resolve on background tasks and come back through
    /// `event_rx`, so commands can interleave with them.
    async fn dispatch(&mut self, event: RecorderEvent) {
        let mut next = Some(event);

        while let Some(event) = next.take() {
            let action = self.machine.apply(event);
            self.publish_phase();

            if let Some(action) = action {
                next = self.execute(action).await;
                self.publish_phase();
            }
        }
    }

    async fn execute(&mut self, action: RecorderAction) -> Option<RecorderEvent> {
        match action {
            RecorderAction::StartCapture => self.start_capture(),
            RecorderAction::FinalizeCapture => self.finalize_capture(),
            RecorderAction::DiscardCapture => {
                if let Some(adapter) = self.adapter.as_mut() {
                    adapter.cancel();
                }
                self.guard.take();
                None
            }
            RecorderAction::Submit {
                request_id,
                payload,
            } => {
                let client = Arc::clone(&self.client);
                let event_tx = self.event_tx.clone();
                let session_id = self.session_id;

                tokio::spawn(async move {
                    let result = client
                        .transcribe(&payload)
                        .await
                        .map_err(|e| e.user_message());

                    if event_tx
                        .send(RecorderEvent::SubmissionResolved { request_id, result })
                        .await
                        .is_err()
                    {
                        debug!(session_id = %session_id, "Session gone before submission resolved");
                    }
                });

                None
            }
            RecorderAction::AdoptTranscript { text } => {
                if self.transcript_tx.send(text).await.is_err() {
                    error!("Transcript receiver dropped");
                }
                None
            }
        }
    }

    /// Acquire the lease and start the capture stream.
    ///
    /// Failures fold back into the machine as `CaptureFailed`; they never
    /// escape the session.
    fn start_capture(&mut self) -> Option<RecorderEvent> {
        let Some(guard) = self.lease.try_acquire(self.session_id) else {
            let message = AppError::MicrophoneBusy {
                location: ErrorLocation::from(Location::caller()),
            }
            .user_message();
            return Some(RecorderEvent::CaptureFailed { message });
        };

        if self.adapter.is_none() {
            match CaptureAdapter::new(self.target_sample_rate) {
                Ok(adapter) => self.adapter = Some(adapter),
                Err(e) => {
                    // Guard drops here, releasing the lease for other sessions
                    return Some(RecorderEvent::CaptureFailed {
                        message: AppError::from(e).user_message(),
                    });
                }
            }
        }

        let started = self
            .adapter
            .as_mut()
            .map(CaptureAdapter::start)
            .unwrap_or(Ok(()));

        match started {
            Ok(()) => {
                self.guard = Some(guard);
                None
            }
            Err(e) => Some(RecorderEvent::CaptureFailed {
                message: AppError::from(e).user_message(),
            }),
        }
    }

    /// Stop the capture, releasing the microphone on every path, and hand
    /// the conversion to the blocking pool.
    ///
    /// The FFT resample and WAV encode of a long dictation are too slow
    /// for the event loop, so they run in `spawn_blocking` and post
    /// `CaptureFinalized`/`CaptureFailed` back over `event_tx`. The loop
    /// keeps serving commands meanwhile; a cancel that lands before the
    /// finalized event is applied still wins.
    fn finalize_capture(&mut self) -> Option<RecorderEvent> {
        let stopped = self.adapter.as_mut().map(CaptureAdapter::stop);

        // Microphone is free as soon as capture has stopped, success or not
        self.guard.take();

        let pending = match stopped {
            Some(Ok(pending)) => pending,
            Some(Err(e)) => {
                return Some(RecorderEvent::CaptureFailed {
                    message: AppError::from(e).user_message(),
                });
            }
            None => {
                return Some(RecorderEvent::CaptureFailed {
                    message: "No capture in progress.".to_string(),
                });
            }
        };

        let event_tx = self.event_tx.clone();
        let session_id = self.session_id;

        tokio::spawn(async move {
            let event = match tokio::task::spawn_blocking(move || pending.finalize()).await {
                Ok(Ok(payload)) => RecorderEvent::CaptureFinalized { payload },
                Ok(Err(e)) => RecorderEvent::CaptureFailed {
                    message: AppError::from(e).user_message(),
                },
                Err(e) => {
                    error!(session_id = %session_id, error = ?e, "Finalization task failed");
                    RecorderEvent::CaptureFailed {
                        message: "Capture finalization failed.".to_string(),
                    }
                }
            };

            if event_tx.send(event).await.is_err() {
                debug!(session_id = %session_id, "Session gone before finalization resolved");
            }
        });

        None
    }

    fn publish_phase(&self) {
        let phase = self.machine.phase();
        if *self.phase_tx.borrow() != *phase {
            let _ = self.phase_tx.send(phase.clone());
        }
    }
}
