use crate::config::default_target_sample_rate;

use serde::{Deserialize, Serialize};

/// Audio capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate of the submitted payload (Hz). Speech transcription
    /// services expect 16 kHz mono.
    #[serde(default = "default_target_sample_rate")]
    pub target_sample_rate: u32,
}
