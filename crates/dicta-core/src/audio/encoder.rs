use crate::{CaptureError, CoreResult};

use std::{io::Cursor, panic::Location};

use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, instrument};

/// Serialize mono f32 samples as an in-memory 16-bit PCM WAV file.
///
/// Samples are clamped to [-1.0, 1.0] before conversion, so an occasional
/// clipped device sample cannot wrap around during the i16 cast.
#[track_caller]
#[instrument(skip(samples))]
pub(crate) fn encode_wav_mono(samples: &[f32], sample_rate: u32) -> CoreResult<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());

    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| CaptureError::EncodingError {
                reason: format!("failed to create WAV writer: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            writer
                .write_sample(value)
                .map_err(|e| CaptureError::EncodingError {
                    reason: format!("failed to write sample: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        writer.finalize().map_err(|e| CaptureError::EncodingError {
            reason: format!("failed to finalize WAV: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    let bytes = cursor.into_inner();

    debug!(
        sample_count = samples.len(),
        byte_len = bytes.len(),
        sample_rate = sample_rate,
        "Encoded WAV payload"
    );

    Ok(bytes)
}
