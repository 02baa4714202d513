use super::error::ReplayError;

/// Notifications an adapter reports through the event dispatch bridge.
///
/// Variants map one-to-one onto native recorder callbacks. For a single
/// adapter, delivery order matches emission order. The session controller
/// also emits a few of these itself (early rejections such as a save with
/// no preview), so synthesized and adapter-originated outcomes share one
/// FIFO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// One-time native setup finished.
    Initialised,
    /// One-time native setup failed; the reason is human-readable.
    InitialiseFailed(String),
    /// Capture is running.
    RecordingStarted,
    /// Capture has stopped; post-processing may still be in progress.
    RecordingStopped,
    /// Post-processing finished; a preview can now be opened.
    RecordingAvailable,
    /// The cycle failed; the reason is forwarded verbatim to consumers.
    RecordingFailed(String),
    PreviewOpened,
    PreviewClosed,
    PreviewPlayed,
    PreviewShared,
    /// Terminal outcome of a save request.
    PreviewSaved(Result<(), ReplayError>),
}
