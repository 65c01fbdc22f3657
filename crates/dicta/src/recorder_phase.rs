/// Lifecycle phase of one dictation composer.
///
/// Modeled as a tagged union so impossible combinations (a timer while not
/// recording, an error message while idle) cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderPhase {
    /// No capture in progress, nothing pending.
    Idle,
    /// Microphone held, audio streaming.
    Recording {
        /// Milliseconds of audio captured so far. Reset to 0 on entry.
        elapsed_ms: u64,
    },
    /// Capture finalized, submission in flight.
    Processing,
    /// Capture or submission failed.
    Error {
        /// User-facing message, service wording verbatim when available.
        message: String,
        /// Whether a preserved payload makes retry possible.
        can_retry: bool,
    },
}

impl RecorderPhase {
    /// Whether audio is currently being captured.
    pub fn is_recording(&self) -> bool {
        matches!(self, RecorderPhase::Recording { .. })
    }

    /// Whether a submission is in flight.
    pub fn is_processing(&self) -> bool {
        matches!(self, RecorderPhase::Processing)
    }
}
