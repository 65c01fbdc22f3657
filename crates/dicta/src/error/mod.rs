use dicta_core::CaptureError;

use std::{panic::Location, result::Result as StdResult};

use error_location::ErrorLocation;
use thiserror::Error;

/// Application-level errors for the dicta binary.
///
/// All variants include `ErrorLocation` for call-site tracking.
#[derive(Error, Debug)]
pub enum AppError {
    /// Capture subsystem error from dicta-core.
    #[error("Capture error: {source} {location}")]
    Capture {
        /// The underlying capture error.
        #[source]
        source: CaptureError,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The microphone is already held by another dictation session.
    #[error("Microphone already in use {location}")]
    MicrophoneBusy {
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Payload rejected locally before any network round-trip.
    #[error("{reason} {location}")]
    ValidationError {
        /// User-facing reason the payload was rejected.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// The transcription service rejected the submission or the network
    /// failed. The message is the service's own wording when available.
    #[error("Submission failed: {message} {location}")]
    SubmissionFailed {
        /// Service-reported message, or a generic fallback.
        message: String,
        /// HTTP status returned by the service, if any.
        status: Option<u16>,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Failed to send message through async channel.
    #[error("Channel send failed: {message} {location}")]
    ChannelSendFailed {
        /// Human-readable error message.
        message: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// Configuration loading or saving error.
    #[error("Configuration error: {reason} {location}")]
    ConfigError {
        /// Human-readable reason for failure.
        reason: String,
        /// Location where this error was created.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    IoError {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Location where this error was created.
        location: ErrorLocation,
    },
}

impl AppError {
    /// The string shown to the user when this error folds into the
    /// recorder's `Error` phase.
    ///
    /// Service-reported and validation messages pass through verbatim;
    /// internal errors get their display form without location noise.
    pub fn user_message(&self) -> String {
        match self {
            AppError::ValidationError { reason, .. } => reason.clone(),
            AppError::SubmissionFailed { message, .. } => message.clone(),
            AppError::MicrophoneBusy { .. } => "Microphone is already in use.".to_string(),
            AppError::Capture { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}

// Manual From<CaptureError> with location tracking.
// Cannot use #[from] because it does not support extra fields.
impl From<CaptureError> for AppError {
    #[track_caller]
    fn from(source: CaptureError) -> Self {
        AppError::Capture {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for AppError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        AppError::IoError {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Convenience type alias for Results using `AppError`.
pub type Result<T> = StdResult<T, AppError>;
