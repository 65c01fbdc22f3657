use crate::config::{default_endpoint, default_max_upload_bytes};

use serde::{Deserialize, Serialize};

/// Transcription endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// URL of the transcription submission endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Client-side upload ceiling in bytes (advisory; the service enforces
    /// its own limit).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}
