use std::sync::Arc;

use crate::dispatch::bridge::EventSender;
use crate::dispatch::deferred::DeferredQueue;
use crate::models::config::ReplaySettings;

/// Hooks handed to an adapter when the session initialises it.
///
/// Cloneable: adapters keep it (or clones of its parts) for the session
/// lifetime and may move clones into background threads.
#[derive(Clone)]
pub struct ServiceContext {
    /// Producer handle for reporting events back to the session.
    pub events: EventSender,

    /// Safe-point queue: work enqueued here runs on the consumer context
    /// during its next pump.
    pub deferred: DeferredQueue,

    /// Immutable settings snapshot for this session.
    pub settings: Arc<ReplaySettings>,
}

/// Capability contract implemented by every platform recording backend.
///
/// Mutating operations are fire-and-observe: the call returns immediately
/// and the outcome arrives later as a `ServiceEvent` through the bridge.
/// Capability queries are synchronous and must be safe to call at any
/// time, including before `initialise` (answer false rather than fail).
///
/// Implemented by:
/// - `UnsupportedService` (this crate, the factory fallback)
/// - `SimulatedService` (replay-sim)
/// - native Android/iOS bridges in their own backend crates
pub trait NativeService: Send {
    /// One-time native setup. Must report exactly one of
    /// `ServiceEvent::Initialised` or `ServiceEvent::InitialiseFailed`,
    /// even when the underlying capability is missing.
    fn initialise(&mut self, ctx: ServiceContext);

    /// Whether the platform recording capability is present and allowed.
    fn is_recording_available(&self) -> bool;

    /// Whether a recording is currently in progress.
    fn is_recording(&self) -> bool;

    /// Whether a finished recording is ready for preview/save/share.
    fn is_preview_available(&self) -> bool;

    /// Whether the platform captures camera input alongside the screen.
    fn is_camera_enabled(&self) -> bool;

    /// Request capture start. No-op if already recording; otherwise the
    /// adapter eventually reports `RecordingStarted` or `RecordingFailed`.
    ///
    /// Backends that must wait for a safe point (a frame boundary) defer
    /// the native call through the context's queue instead of dropping
    /// the request.
    fn start_recording(&mut self, microphone_enabled: bool);

    /// Request capture stop. No-op if not recording; otherwise the adapter
    /// eventually reports `RecordingStopped`, then `RecordingAvailable`
    /// once post-processing completes, or `RecordingFailed`.
    fn stop_recording(&mut self);

    /// Open the platform preview over the finished recording.
    /// Returns whether the request was accepted.
    fn preview(&mut self) -> bool;

    /// Delete the finished recording. Returns whether anything was
    /// discarded.
    fn discard(&mut self) -> bool;

    /// Location of the finished recording, if one exists. Opaque; may be
    /// a filesystem path or a platform URI.
    fn preview_file_path(&self) -> Option<String>;

    /// Persist the finished recording under `filename` (or a generated
    /// name). The outcome always arrives as `ServiceEvent::PreviewSaved`;
    /// the request is never silently dropped.
    fn save_preview(&mut self, filename: Option<&str>);

    /// Hand the finished recording to the platform share surface.
    /// Fire-and-forget; progress is visible only through preview events.
    fn share_preview(&mut self, text: Option<&str>, subject: Option<&str>);
}
