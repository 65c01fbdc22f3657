use std::sync::Arc;

/// MIME type of every payload this crate produces.
pub const WAV_CONTENT_TYPE: &str = "audio/wav";

/// A finalized capture, ready for submission.
///
/// Bytes live behind an `Arc` so a retry after a failed submission resends
/// the identical payload without copying or re-capturing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    bytes: Arc<[u8]>,
    content_type: &'static str,
    duration_ms: u64,
}

impl AudioPayload {
    /// Wrap encoded WAV bytes together with the capture duration they
    /// represent.
    pub fn wav(bytes: Vec<u8>, duration_ms: u64) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: WAV_CONTENT_TYPE,
            duration_ms,
        }
    }

    /// Encoded audio bytes.
    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// MIME type of the encoded audio.
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Capture duration represented by this payload.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Size of the encoded audio in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload carries no audio data.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
