use crate::audio::AudioPayload;
use crate::audio::encoder::encode_wav_mono;

use std::io::Cursor;

const SAMPLE_RATE: u32 = 16000;

/// WHAT: Encoded WAV declares 16kHz mono 16-bit PCM
/// WHY: The transcription endpoint only accepts this exact format
#[test]
#[allow(clippy::unwrap_used)]
fn given_mono_samples_when_encoding_then_wav_header_correct() {
    // Given: One second of silence at the target rate
    let samples = vec![0.0f32; SAMPLE_RATE as usize];

    // When: Encoding to WAV
    let bytes = encode_wav_mono(&samples, SAMPLE_RATE).unwrap();

    // Then: Header fields match the submission contract
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.len(), SAMPLE_RATE);
}

/// WHAT: Out-of-range samples are clamped, not wrapped
/// WHY: A clipped device sample must not flip sign during i16 conversion
#[test]
#[allow(clippy::unwrap_used)]
fn given_clipped_samples_when_encoding_then_values_clamped() {
    // Given: Samples beyond the nominal [-1, 1] range
    let samples = vec![2.0f32, -2.0, 1.0, -1.0];

    // When: Encoding and reading back
    let bytes = encode_wav_mono(&samples, SAMPLE_RATE).unwrap();
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();

    // Then: Over-range inputs saturate at full scale
    assert_eq!(decoded[0], i16::MAX);
    assert_eq!(decoded[1], -i16::MAX);
    assert_eq!(decoded[2], i16::MAX);
    assert_eq!(decoded[3], -i16::MAX);
}

/// WHAT: Empty input produces a valid zero-sample WAV
/// WHY: The adapter rejects empty captures upstream; the encoder itself must not fail
#[test]
#[allow(clippy::unwrap_used)]
fn given_no_samples_when_encoding_then_valid_empty_wav() {
    // Given: No samples
    let samples: Vec<f32> = vec![];

    // When: Encoding
    let bytes = encode_wav_mono(&samples, SAMPLE_RATE).unwrap();

    // Then: The container parses and holds zero samples
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.len(), 0);
}

/// WHAT: Payload clones share the same underlying bytes
/// WHY: Retry must resubmit the bit-identical payload without copying
#[test]
fn given_payload_clone_when_comparing_then_bytes_shared_and_identical() {
    // Given: A payload wrapping encoded audio
    let payload = AudioPayload::wav(vec![1, 2, 3, 4], 250);

    // When: Cloning for a retry
    let retry = payload.clone();

    // Then: Same allocation, same bytes, same metadata
    assert!(std::sync::Arc::ptr_eq(payload.bytes(), retry.bytes()));
    assert_eq!(payload, retry);
    assert_eq!(retry.duration_ms(), 250);
    assert_eq!(retry.content_type(), "audio/wav");
    assert_eq!(retry.len(), 4);
    assert!(!retry.is_empty());
}
