use crate::audio::{PendingCapture, Resampler};

use std::io::Cursor;

const DEVICE_RATE: u32 = 48_000;
const TARGET_RATE: u32 = 16_000;

/// WHAT: Finalizing a stereo device capture yields a mono WAV at the target rate
/// WHY: The stopped capture is plain data, so the whole conversion can run off the event loop
#[test]
#[allow(clippy::unwrap_used)]
fn given_stereo_capture_when_finalized_then_mono_wav_at_target_rate() {
    // Given: One second of 48kHz stereo and its session resampler
    let samples = vec![0.25f32; DEVICE_RATE as usize * 2];
    let resampler = Resampler::new(DEVICE_RATE, TARGET_RATE).unwrap();
    let pending = PendingCapture::new(samples, 2, Some(resampler), TARGET_RATE, 1000);
    assert_eq!(pending.duration_ms(), 1000);

    // When: Finalizing into a payload
    let payload = pending.finalize().unwrap();

    // Then: A mono 16kHz WAV carrying the capture duration
    let reader = hound::WavReader::new(Cursor::new(payload.bytes().to_vec())).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, TARGET_RATE);
    assert_eq!(reader.len(), TARGET_RATE);
    assert_eq!(payload.duration_ms(), 1000);
}

/// WHAT: A capture already at the target rate is down-mixed without resampling
/// WHY: Matching device and target rates must skip the rate conversion entirely
#[test]
#[allow(clippy::unwrap_used)]
fn given_matching_rate_capture_when_finalized_then_downmix_only() {
    // Given: Half a second of 16kHz stereo with no resampler configured
    let frames = TARGET_RATE as usize / 2;
    let samples = vec![0.5f32; frames * 2];
    let pending = PendingCapture::new(samples, 2, None, TARGET_RATE, 500);

    // When: Finalizing into a payload
    let payload = pending.finalize().unwrap();

    // Then: One output sample per input frame
    let reader = hound::WavReader::new(Cursor::new(payload.bytes().to_vec())).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.len() as usize, frames);
}
