/// Format capture progress as `mm:ss`.
///
/// Input is the millisecond count reported by the capture layer, never a
/// free-running clock. Minutes are unbounded; dictations are short.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_seconds = elapsed_ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
