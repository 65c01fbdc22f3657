//! Dicta Core Library
//!
//! Microphone capture and speech-payload conversion using CPAL, Rubato,
//! and Hound. Produces 16 kHz mono WAV payloads suitable for speech
//! transcription services.
//!
//! # Example
//!
//! ```no_run
//! use dicta_core::{CaptureAdapter, CoreResult};
//!
//! use std::{thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let mut adapter = CaptureAdapter::new(16_000)?;
//!
//!     adapter.start()?;
//!     sleep(Duration::from_secs(3));
//!     let payload = adapter.stop()?.finalize()?;
//!
//!     println!("Captured {}ms as {} bytes", payload.duration_ms(), payload.len());
//!     Ok(())
//! }
//! ```

mod audio;
mod error;

pub use {
    audio::{AudioPayload, CaptureAdapter, PendingCapture, WAV_CONTENT_TYPE},
    error::CaptureError,
    error::Result as CoreResult,
};

#[cfg(test)]
mod tests;
