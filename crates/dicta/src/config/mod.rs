mod audio_config;
#[allow(clippy::module_inception)]
mod config;
mod transcription_config;

pub(crate) use {audio_config::AudioConfig, config::Config};
pub use transcription_config::TranscriptionConfig;

pub(crate) const DEFAULT_ENDPOINT: &str = "http://localhost:3000/resources/open-ai-dictation";
/// Advisory client-side ceiling; the service enforces its own 10 MB limit.
pub(crate) const DEFAULT_MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;
pub(crate) const DEFAULT_TARGET_SAMPLE_RATE: u32 = 16_000;

pub(crate) fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub(crate) fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

pub(crate) fn default_target_sample_rate() -> u32 {
    DEFAULT_TARGET_SAMPLE_RATE
}
