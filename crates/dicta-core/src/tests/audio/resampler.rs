use crate::audio::Resampler;
use crate::audio::resampler::downmix_to_mono;

// Test constants
const INPUT_SAMPLE_RATE: u32 = 48000;
const OUTPUT_SAMPLE_RATE: u32 = 16000;
const ONE_SECOND_INPUT_SAMPLES: usize = INPUT_SAMPLE_RATE as usize;
const ONE_SECOND_OUTPUT_SAMPLES: usize = OUTPUT_SAMPLE_RATE as usize;
const LENGTH_TOLERANCE: u64 = 100;
const TEST_SIGNAL_AMPLITUDE: f32 = 0.5;

/// WHAT: Stereo interleaved input averages down to one channel
/// WHY: The transcription service requires mono audio regardless of device layout
#[test]
fn given_interleaved_stereo_when_downmixing_then_channels_averaged() {
    // Given: Interleaved stereo with distinct channel values
    let interleaved = vec![1.0f32, 0.0, 0.5, 0.5, -1.0, 1.0];

    // When: Down-mixing to mono
    let mono = downmix_to_mono(&interleaved, 2);

    // Then: Each frame is the average of its channels
    assert_eq!(mono.len(), 3);
    assert!((mono[0] - 0.5).abs() < f32::EPSILON);
    assert!((mono[1] - 0.5).abs() < f32::EPSILON);
    assert!(mono[2].abs() < f32::EPSILON);
}

/// WHAT: Mono input passes through the down-mix unchanged
/// WHY: Single-channel devices must not be altered by channel handling
#[test]
fn given_mono_input_when_downmixing_then_samples_unchanged() {
    // Given: Already-mono samples
    let samples = vec![0.25f32, -0.25, 0.75];

    // When: Down-mixing with channels = 1
    let mono = downmix_to_mono(&samples, 1);

    // Then: Output is identical to input
    assert_eq!(mono, samples);
}

/// WHAT: Ragged trailing partial frame is dropped by the down-mix
/// WHY: A backend delivering a partial frame must not corrupt channel alignment
#[test]
fn given_partial_trailing_frame_when_downmixing_then_tail_ignored() {
    // Given: Stereo data with one dangling sample
    let interleaved = vec![1.0f32, 1.0, 0.5];

    // When: Down-mixing to mono
    let mono = downmix_to_mono(&interleaved, 2);

    // Then: Only the complete frame survives
    assert_eq!(mono.len(), 1);
    assert!((mono[0] - 1.0).abs() < f32::EPSILON);
}

/// WHAT: Resampler converts 48kHz to 16kHz correctly
/// WHY: Ensures audio is properly downsampled for speech transcription
#[test]
#[allow(clippy::unwrap_used)]
fn given_48khz_audio_when_resampling_to_16khz_then_output_length_approximately_correct() {
    // Given: Resampler configured for 48kHz -> 16kHz
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    let input = vec![TEST_SIGNAL_AMPLITUDE; ONE_SECOND_INPUT_SAMPLES];

    // When: Processing mono audio data
    let output = resampler.process(&input, 1).unwrap();

    // Then: Output is approximately 1 second at 16kHz
    assert!(
        (output.len() as i64 - ONE_SECOND_OUTPUT_SAMPLES as i64).unsigned_abs() < LENGTH_TOLERANCE,
        "Expected ~{} samples, got {}",
        ONE_SECOND_OUTPUT_SAMPLES,
        output.len()
    );
    assert!(output.iter().all(|&s| s.is_finite())); // No NaN/Inf
}

/// WHAT: Matching input and output rates skip resampling
/// WHY: A 16kHz device needs only the down-mix, not a rate conversion
#[test]
#[allow(clippy::unwrap_used)]
fn given_matching_rates_when_processing_then_only_downmix_applied() {
    // Given: Resampler with identical input and output rates
    let mut resampler = Resampler::new(OUTPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    let interleaved = vec![0.5f32, 0.5, -0.5, -0.5];

    // When: Processing stereo data
    let output = resampler.process(&interleaved, 2).unwrap();

    // Then: Output is the down-mixed frames, untouched by resampling
    assert_eq!(output.len(), 2);
    assert!((output[0] - 0.5).abs() < f32::EPSILON);
    assert!((output[1] + 0.5).abs() < f32::EPSILON);
}

/// WHAT: Empty samples return empty output
/// WHY: Edge case handling for zero-length input
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_samples_when_processing_then_empty_output() {
    // Given: Resampler and empty input
    let mut resampler = Resampler::new(INPUT_SAMPLE_RATE, OUTPUT_SAMPLE_RATE).unwrap();
    let empty: Vec<f32> = vec![];

    // When: Processing empty data
    let output = resampler.process(&empty, 2).unwrap();

    // Then: Output is also empty
    assert!(output.is_empty());
}
