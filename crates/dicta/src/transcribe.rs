//! Transcription submission client.
//!
//! Exchanges one finalized audio payload for transcribed text over a
//! single-part multipart upload. Payloads are validated locally before any
//! network round-trip; service-reported error messages are surfaced
//! verbatim.

use crate::{AppError, AppResult, config::TranscriptionConfig};

use std::panic::Location;

use dicta_core::{AudioPayload, WAV_CONTENT_TYPE};
use error_location::ErrorLocation;
use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Fallback when the service gives us nothing usable to show.
const GENERIC_FAILURE: &str = "An unexpected error occurred";

/// Response envelope returned by the transcription endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum ApiEnvelope {
    /// Transcription succeeded.
    Success {
        /// Payload of a successful transcription.
        data: TranscriptionData,
    },
    /// The service rejected the submission.
    Error {
        /// Service-reported, user-facing message.
        message: String,
    },
}

/// Body of a successful response.
#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptionData {
    /// The transcribed text.
    pub(crate) transcription: String,
}

/// HTTP client for the transcription endpoint.
///
/// Stateless with respect to payloads: resubmitting the same
/// [`AudioPayload`] after a failure is always possible.
pub struct TranscriptionClient {
    http: reqwest::Client,
    endpoint: String,
    max_upload_bytes: u64,
}

impl TranscriptionClient {
    /// Build a client from the transcription configuration.
    pub fn new(config: &TranscriptionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Reject a payload that should never reach the network.
    ///
    /// This ceiling is advisory; the service enforces its own limit and
    /// reports its own message when exceeded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ValidationError`] with the user-facing reason.
    #[track_caller]
    pub fn validate(&self, payload: &AudioPayload) -> AppResult<()> {
        if payload.is_empty() {
            return Err(AppError::ValidationError {
                reason: "No audio file uploaded.".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if payload.content_type() != WAV_CONTENT_TYPE {
            return Err(AppError::ValidationError {
                reason: "Only .wav allowed!".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if payload.len() as u64 > self.max_upload_bytes {
            return Err(AppError::ValidationError {
                reason: format!(
                    "File size exceeds {}MB limit.",
                    self.max_upload_bytes / (1024 * 1024)
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    /// Submit one payload and return the transcribed text.
    ///
    /// # Errors
    ///
    /// [`AppError::ValidationError`] for locally rejected payloads (no
    /// network traffic), [`AppError::SubmissionFailed`] for transport or
    /// service failures — recoverable by resubmitting the same payload.
    #[track_caller]
    #[instrument(skip(self, payload), fields(byte_len = payload.len()))]
    pub async fn transcribe(&self, payload: &AudioPayload) -> AppResult<String> {
        self.validate(payload)?;

        let part = multipart::Part::bytes(payload.bytes().to_vec())
            .file_name("recording.wav")
            .mime_str(payload.content_type())
            .map_err(|e| {
                warn!(error = %e, "Failed to build multipart body");
                AppError::SubmissionFailed {
                    message: GENERIC_FAILURE.to_string(),
                    status: None,
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let form = multipart::Form::new().part("audio", part);

        debug!(endpoint = %self.endpoint, "Submitting audio for transcription");

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Transcription request failed to send");
                AppError::SubmissionFailed {
                    message: GENERIC_FAILURE.to_string(),
                    status: None,
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let status = response.status();

        let envelope: ApiEnvelope = response.json().await.map_err(|e| {
            warn!(status = status.as_u16(), error = %e, "Unparseable transcription response");
            AppError::SubmissionFailed {
                message: GENERIC_FAILURE.to_string(),
                status: Some(status.as_u16()),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        match envelope {
            ApiEnvelope::Success { data } => {
                info!(
                    status = status.as_u16(),
                    text_len = data.transcription.len(),
                    "Transcription received"
                );
                Ok(data.transcription)
            }
            ApiEnvelope::Error { message } => {
                // The service's wording reaches the user untouched
                warn!(status = status.as_u16(), message = %message, "Service rejected submission");
                Err(AppError::SubmissionFailed {
                    message,
                    status: Some(status.as_u16()),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }
}
