use error_location::ErrorLocation;
use thiserror::Error;

/// Audio capture and conversion errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// No input device exists or permission to use it was denied.
    ///
    /// Terminal for that start attempt; the caller must request a new
    /// capture explicitly.
    #[error("Microphone unavailable: {reason} {location}")]
    CaptureUnavailable {
        /// Why the microphone could not be acquired.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio device operation failed after acquisition.
    #[error("Audio device error: {reason} {location}")]
    DeviceError {
        /// Description of the device error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio down-mixing or resampling failed.
    #[error("Resampling error: {reason} {location}")]
    ResamplingError {
        /// Description of the resampling error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// WAV serialization failed.
    #[error("Encoding error: {reason} {location}")]
    EncodingError {
        /// Description of the encoding error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture finalized with an empty sample buffer.
    #[error("No audio captured {location}")]
    NoAudioCaptured {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
