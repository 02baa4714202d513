//! # replay-core
//!
//! Platform-agnostic screen replay core library.
//!
//! Provides the session state machine, cross-thread event dispatch,
//! audio ducking, and the consumer facade. Platform-specific backends
//! (Android, iOS) implement the `NativeService` trait and plug into the
//! generic `SessionController` behind a `ReplayKit`.
//!
//! ## Architecture
//!
//! ```text
//! replay-core (this crate)
//! ├── traits/       ← NativeService, ReplayObserver, AudioEmitter
//! ├── models/       ← ReplayError, ReplaySettings, ServiceEvent, state enums
//! ├── dispatch/     ← EventBridge, DeferredQueue (native → consumer handoff)
//! ├── audio/        ← DuckingCoordinator (pause/restore around transitions)
//! ├── session/      ← SessionController (generic orchestrator)
//! ├── platform/     ← Platform detection, UnsupportedService fallback
//! └── kit.rs        ← ReplayKit facade and builder
//! ```

pub mod audio;
pub mod dispatch;
pub mod kit;
pub mod models;
pub mod platform;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use audio::ducking::{DuckedSnapshot, DuckingCoordinator, RESTORE_SETTLE_DELAY};
pub use dispatch::bridge::{EventBridge, EventSender};
pub use dispatch::deferred::DeferredQueue;
pub use kit::{ReplayKit, ReplayKitBuilder};
pub use models::config::{ReplaySettings, VideoQuality};
pub use models::error::ReplayError;
pub use models::events::ServiceEvent;
pub use models::state::{InitialisationState, PreviewState, RecordingPhase, RecordingState};
pub use platform::unsupported::UnsupportedService;
pub use platform::Platform;
pub use session::controller::{
    Notification, SavePreviewCallback, SessionController, ALREADY_INITIALISED_NOTE,
};
pub use traits::audio_emitter::AudioEmitter;
pub use traits::native_service::{NativeService, ServiceContext};
pub use traits::observer::ReplayObserver;
