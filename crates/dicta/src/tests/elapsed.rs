use crate::elapsed::format_elapsed;

/// WHAT: Millisecond counts format as zero-padded mm:ss
/// WHY: The composer timer must read the same at 3 seconds and 12 minutes
#[test]
fn given_capture_progress_when_formatting_then_padded_mm_ss() {
    assert_eq!(format_elapsed(0), "00:00");
    assert_eq!(format_elapsed(999), "00:00");
    assert_eq!(format_elapsed(1000), "00:01");
    assert_eq!(format_elapsed(3000), "00:03");
    assert_eq!(format_elapsed(59_999), "00:59");
    assert_eq!(format_elapsed(60_000), "01:00");
    assert_eq!(format_elapsed(754_000), "12:34");
}

/// WHAT: Minutes keep counting past the hour
/// WHY: Duration is unbounded; the display must not wrap or overflow
#[test]
fn given_long_session_when_formatting_then_minutes_unbounded() {
    assert_eq!(format_elapsed(60 * 60 * 1000), "60:00");
    assert_eq!(format_elapsed(99 * 60 * 1000 + 5000), "99:05");
}
