use crate::{
    CaptureError, CoreResult,
    audio::{AudioCapturer, AudioPayload, Resampler, encoder::encode_wav_mono},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Owns the microphone for one capture session at a time.
///
/// `start()` acquires the stream, `stop()` releases it and hands back a
/// [`PendingCapture`] to finalize (down-mix, resample, WAV-encode), and
/// `cancel()` discards everything. Every exit path drops the underlying
/// stream handle, so the device is released whether a session completes,
/// fails, or is torn down.
///
/// # Thread Safety
///
/// CaptureAdapter is NOT thread-safe. It should be driven from a single
/// task; only `captured_ms()` is safe to read concurrently.
pub struct CaptureAdapter {
    capturer: AudioCapturer,
    resampler: Option<Resampler>,
    target_rate: u32,
}

impl CaptureAdapter {
    /// Bind to the default input device, targeting `target_rate` Hz mono
    /// output (16 kHz for speech transcription).
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::CaptureUnavailable`] if no usable input
    /// device exists.
    #[track_caller]
    #[instrument]
    pub fn new(target_rate: u32) -> CoreResult<Self> {
        let capturer = AudioCapturer::new()?;

        info!(target_rate = target_rate, "CaptureAdapter initialized");

        Ok(Self {
            capturer,
            resampler: None,
            target_rate,
        })
    }

    /// Acquire the capture stream and begin buffering audio.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be built or started; no
    /// partial state is left behind on failure.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start(&mut self) -> CoreResult<()> {
        let device_rate = self.capturer.sample_rate();

        if device_rate != self.target_rate {
            self.resampler = Some(Resampler::new(device_rate, self.target_rate)?);
            debug!(
                input_rate = device_rate,
                output_rate = self.target_rate,
                "Resampler configured"
            );
        } else {
            self.resampler = None;
        }

        self.capturer.start()?;

        info!("Capture session started");

        Ok(())
    }

    /// Stop the stream and hand back the drained capture.
    ///
    /// Fast path: the device is released and the microphone is free as
    /// soon as this returns. The expensive conversion to a payload lives
    /// in [`PendingCapture::finalize`], which is plain data work and can
    /// run on a blocking thread.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::NoAudioCaptured`] when the device delivered
    /// no samples.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> CoreResult<PendingCapture> {
        let duration_ms = self.capturer.captured_ms();
        let channels = self.capturer.channels();
        let samples = self.capturer.stop()?;

        if samples.is_empty() {
            return Err(CaptureError::NoAudioCaptured {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(
            duration_ms = duration_ms,
            sample_count = samples.len(),
            "Capture session stopped, conversion pending"
        );

        Ok(PendingCapture::new(
            samples,
            channels,
            self.resampler.take(),
            self.target_rate,
            duration_ms,
        ))
    }

    /// Stop capture and discard the audio without producing a payload.
    ///
    /// Infallible: the stream is dropped and buffers cleared best-effort.
    #[instrument(skip(self))]
    pub fn cancel(&mut self) {
        self.capturer.discard();
        self.resampler = None;
    }

    /// Milliseconds of audio captured so far in the active session.
    ///
    /// Derived from frames the device has actually delivered; if capture
    /// stalls, this value stalls with it instead of drifting.
    pub fn captured_ms(&self) -> u64 {
        self.capturer.captured_ms()
    }
}

/// A stopped capture awaiting conversion into a payload.
///
/// Plain data detached from the device: the FFT resample and WAV encode of
/// a long dictation can take a while, so callers move this to a blocking
/// thread instead of stalling their event loop on it.
pub struct PendingCapture {
    samples: Vec<f32>,
    channels: u16,
    resampler: Option<Resampler>,
    target_rate: u32,
    duration_ms: u64,
}

impl PendingCapture {
    pub(crate) fn new(
        samples: Vec<f32>,
        channels: u16,
        resampler: Option<Resampler>,
        target_rate: u32,
        duration_ms: u64,
    ) -> Self {
        Self {
            samples,
            channels,
            resampler,
            target_rate,
            duration_ms,
        }
    }

    /// Milliseconds of audio this capture holds.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Convert the drained samples into a submission-ready payload.
    ///
    /// # Errors
    ///
    /// Returns a resampling or encoding error from the conversion
    /// pipeline.
    #[track_caller]
    #[instrument(skip(self), fields(sample_count = self.samples.len()))]
    pub fn finalize(mut self) -> CoreResult<AudioPayload> {
        let mono = match self.resampler {
            Some(ref mut resampler) => resampler.process(&self.samples, self.channels)?,
            None => crate::audio::resampler::downmix_to_mono(&self.samples, self.channels),
        };

        let bytes = encode_wav_mono(&mono, self.target_rate)?;
        let payload = AudioPayload::wav(bytes, self.duration_ms);

        info!(
            duration_ms = self.duration_ms,
            byte_len = payload.len(),
            "Capture finalized"
        );

        Ok(payload)
    }
}
