mod adapter;
pub(crate) mod capture;
pub(crate) mod encoder;
mod payload;
pub(crate) mod resampler;

pub(crate) use {capture::AudioCapturer, resampler::Resampler};

pub use {
    adapter::{CaptureAdapter, PendingCapture},
    payload::{AudioPayload, WAV_CONTENT_TYPE},
};
