/// Commands sent from the UI layer to a dictation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Begin a new capture.
    Start,
    /// Finalize the capture and submit it.
    Stop,
    /// Abandon the current capture or dismiss an error.
    Cancel,
    /// Resubmit the preserved payload after a failure.
    Retry,
    /// Discard everything and return to idle.
    Reset,
    /// Tear the session down, releasing the microphone if held.
    Shutdown,
}
