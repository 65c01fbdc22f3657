use crate::{CaptureError, CoreResult};

use std::{
    collections::VecDeque,
    panic::Location,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Maximum samples to buffer (5 minutes at 48kHz stereo).
/// Prevents unbounded memory growth during long dictation sessions.
///
/// **Memory footprint at max capacity:**
/// - 48,000 Hz * 60s * 5 min * 2 ch * 4 bytes/f32 = ~115MB
/// - This is a hard upper bound; typical dictations are seconds long
pub(crate) const MAX_BUFFER_SAMPLES: usize = 48_000 * 60 * 5 * 2;

/// Microphone stream owner.
///
/// Buffers interleaved f32 samples from the device callback and tracks
/// capture progress as a frame count, so elapsed time can be derived from
/// audio actually delivered rather than from a free-running wall clock.
pub struct AudioCapturer {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    samples: Arc<Mutex<VecDeque<f32>>>,
    /// Frames delivered by the device callback since `start()`.
    /// Progress source for elapsed-time display.
    frames_captured: Arc<AtomicU64>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes after the
    /// lock is acquired in `stop()`.
    shutdown: Arc<AtomicBool>,
}

impl AudioCapturer {
    /// Bind to the default input device.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CaptureUnavailable`] when no input device
    /// exists or its configuration cannot be read (the usual symptom of a
    /// denied permission).
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(CaptureError::CaptureUnavailable {
                reason: "no input device found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| CaptureError::CaptureUnavailable {
                reason: format!("failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "AudioCapturer initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            stream: None,
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_BUFFER_SAMPLES))),
            frames_captured: Arc::new(AtomicU64::new(0)),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Begin streaming samples from the microphone.
    ///
    /// Clears any buffered audio and resets the progress counter, so a new
    /// session never observes a previous session's frames.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        let samples = Arc::clone(&self.samples);
        let frames_captured = Arc::clone(&self.frames_captured);
        let shutdown = Arc::clone(&self.shutdown);
        let channels = u64::from(self.config.channels.max(1));

        // Reset per-session state before the stream goes live
        self.shutdown.store(false, Ordering::Release);
        self.frames_captured.store(0, Ordering::Release);

        samples
            .lock()
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .clear();

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // Check shutdown flag before acquiring lock. Once stop()
                    // sets this flag, no new samples will be written even if
                    // CPAL fires one more callback before the stream is dropped.
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    // Recover from lock poison rather than silently dropping audio.
                    // A poisoned mutex means a previous holder panicked, but the
                    // VecDeque data is still valid and usable.
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    buf.extend(data.iter().copied());
                    // Ring buffer: O(1) amortized drop of oldest samples via VecDeque
                    while buf.len() > MAX_BUFFER_SAMPLES {
                        buf.pop_front();
                    }
                    // Progress is counted even when old samples are discarded:
                    // the timer reflects capture duration, not buffer occupancy.
                    frames_captured.fetch_add(data.len() as u64 / channels, Ordering::AcqRel);
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| CaptureError::DeviceError {
            reason: format!("failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);
        info!("Audio capture started");

        Ok(())
    }

    /// Stop streaming and drain the buffered interleaved samples.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<Vec<f32>> {
        // Signal callback to stop writing BEFORE dropping the stream, so a
        // late callback observes the flag and returns without touching the
        // buffer we are about to drain.
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Brief yield so any in-flight callback observes the shutdown
            // flag and completes. On most CPAL backends drop() joins the
            // audio thread and this is redundant.
            std::thread::sleep(std::time::Duration::from_millis(5));
            info!("Audio capture stopped");
        }

        let samples: Vec<f32> = self
            .samples
            .lock()
            .map_err(|e| CaptureError::DeviceError {
                reason: format!("failed to lock samples: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?
            .iter()
            .copied()
            .collect();

        debug!(sample_count = samples.len(), "Captured audio samples");

        Ok(samples)
    }

    /// Stop streaming and throw away everything captured so far.
    ///
    /// Never fails: the stream handle is dropped (releasing the device on
    /// every exit path) and the buffer is cleared best-effort.
    #[instrument(skip(self))]
    pub fn discard(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            info!("Audio capture cancelled");
        }

        let mut buf = self.samples.lock().unwrap_or_else(|e| e.into_inner());
        buf.clear();
        self.frames_captured.store(0, Ordering::Release);
    }

    /// Milliseconds of audio delivered by the device since `start()`.
    pub fn captured_ms(&self) -> u64 {
        let frames = self.frames_captured.load(Ordering::Acquire);
        frames * 1000 / u64::from(self.config.sample_rate.max(1))
    }

    /// Device sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Number of interleaved channels the device delivers.
    pub fn channels(&self) -> u16 {
        self.config.channels
    }
}
