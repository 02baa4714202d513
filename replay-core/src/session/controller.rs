use std::sync::Arc;
use std::time::Instant;

use crate::audio::ducking::{DuckedSnapshot, DuckingCoordinator};
use crate::dispatch::bridge::{EventBridge, EventSender};
use crate::dispatch::deferred::DeferredQueue;
use crate::models::config::ReplaySettings;
use crate::models::error::ReplayError;
use crate::models::events::ServiceEvent;
use crate::models::state::{InitialisationState, PreviewState, RecordingPhase, RecordingState};
use crate::traits::native_service::{NativeService, ServiceContext};

/// Completion handler for a save request. Invoked exactly once, on the
/// consumer context, unless a newer save replaces it first.
pub type SavePreviewCallback = Box<dyn FnOnce(Result<(), ReplayError>) + Send>;

/// Note attached to the success announcement when `initialise` is called
/// on an already initialised session.
pub const ALREADY_INITIALISED_NOTE: &str = "already initialised";

/// Outbound notification produced by a pump cycle, delivered by the
/// facade after the session lock is released.
pub enum Notification {
    Initialise(InitialisationState, String),
    Recording(RecordingState),
    SaveComplete(SavePreviewCallback, Result<(), ReplayError>),
}

/// Progress of the one-time adapter initialisation, latched at request
/// time so repeated calls cannot reach the adapter twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitialisePhase {
    Idle,
    Requested,
    Confirmed,
}

/// Platform-agnostic replay session orchestrator.
///
/// Owns the native adapter, the event bridge, the deferred queue, and
/// the ducking coordinator, and turns adapter events into phase
/// transitions and observer notifications:
/// ```text
/// [NativeService] → [EventBridge] ─┐
///                                   ├→ pump() → [Notification]
/// [DeferredQueue] ──────────────────┘
/// ```
/// All state lives behind the facade's lock; `pump` must run on the
/// consumer context so notifications and save callbacks fire there.
pub struct SessionController {
    service: Box<dyn NativeService>,
    settings: Arc<ReplaySettings>,
    bridge: EventBridge,
    events: EventSender,
    deferred: DeferredQueue,
    ducker: DuckingCoordinator,

    init_phase: InitialisePhase,
    phase: RecordingPhase,
    microphone_enabled: bool,

    // Snapshot of the ducking cycle opened by the in-flight transition;
    // resolved on the first terminal recording event.
    duck_pending: Option<DuckedSnapshot>,

    // Single pending save slot; a newer save replaces the older callback.
    pending_save: Option<SavePreviewCallback>,

    last_preview_state: Option<PreviewState>,
}

impl SessionController {
    pub fn new(service: Box<dyn NativeService>, settings: ReplaySettings) -> Self {
        let bridge = EventBridge::new();
        let events = bridge.sender();
        let ducker = DuckingCoordinator::new(settings.control_audio);
        Self {
            service,
            settings: Arc::new(settings),
            bridge,
            events,
            deferred: DeferredQueue::new(),
            ducker,
            init_phase: InitialisePhase::Idle,
            phase: RecordingPhase::Idle,
            microphone_enabled: false,
            duck_pending: None,
            pending_save: None,
            last_preview_state: None,
        }
    }

    pub fn settings(&self) -> &Arc<ReplaySettings> {
        &self.settings
    }

    pub fn ducking(&self) -> &DuckingCoordinator {
        &self.ducker
    }

    pub fn is_initialised(&self) -> bool {
        self.init_phase == InitialisePhase::Confirmed
    }

    pub fn recording_phase(&self) -> RecordingPhase {
        self.phase
    }

    /// Microphone flag of the most recently accepted start.
    pub fn is_microphone_enabled(&self) -> bool {
        self.microphone_enabled
    }

    /// Hand the adapter its context. Idempotent and latched at request
    /// time: once an initialise has been requested or confirmed, later
    /// calls re-announce success synchronously with
    /// [`ALREADY_INITIALISED_NOTE`] instead of touching the adapter.
    pub fn initialise(&mut self) -> Option<Notification> {
        if self.init_phase != InitialisePhase::Idle {
            return Some(Notification::Initialise(
                InitialisationState::Success,
                ALREADY_INITIALISED_NOTE.to_string(),
            ));
        }
        self.init_phase = InitialisePhase::Requested;
        let ctx = ServiceContext {
            events: self.events.clone(),
            deferred: self.deferred.clone(),
            settings: Arc::clone(&self.settings),
        };
        self.service.initialise(ctx);
        None
    }

    pub fn is_recording_available(&self) -> bool {
        self.service.is_recording_available()
    }

    pub fn is_recording(&self) -> bool {
        self.service.is_recording()
    }

    pub fn is_preview_available(&self) -> bool {
        self.service.is_preview_available()
    }

    pub fn is_camera_enabled(&self) -> bool {
        self.service.is_camera_enabled()
    }

    /// Begin a capture. Transitions: idle/stopped/available → starting.
    ///
    /// A start that is not accepted leaves the microphone flag, the
    /// phase, and the audio sources untouched.
    pub fn start_recording(&mut self, microphone_enabled: bool) {
        if !self.phase.can_start() {
            log::warn!("start_recording ignored in phase {:?}", self.phase);
            return;
        }
        if !self.is_initialised() {
            log::warn!("start_recording before initialise");
            self.events.emit(ServiceEvent::RecordingFailed(
                "session is not initialised".to_string(),
            ));
            return;
        }

        self.microphone_enabled = microphone_enabled;
        self.duck_pending = Some(self.ducker.duck_all());
        self.phase = RecordingPhase::Starting;
        self.service.start_recording(microphone_enabled);
    }

    /// End the capture. Transitions: started → stopping. Ignored in any
    /// other phase.
    pub fn stop_recording(&mut self) {
        if !self.phase.can_stop() {
            log::warn!("stop_recording ignored in phase {:?}", self.phase);
            return;
        }

        self.duck_pending = Some(self.ducker.duck_all());
        self.phase = RecordingPhase::Stopping;
        self.service.stop_recording();
    }

    /// Open the native preview window. Returns whether the adapter
    /// accepted the request.
    pub fn preview(&mut self) -> bool {
        if !self.is_initialised() {
            return false;
        }
        self.service.preview()
    }

    /// Discard the finished recording. Returns whether anything was
    /// discarded.
    pub fn discard(&mut self) -> bool {
        if !self.is_initialised() {
            return false;
        }
        self.service.discard()
    }

    pub fn preview_file_path(&self) -> Option<String> {
        if !self.is_initialised() {
            return None;
        }
        self.service.preview_file_path()
    }

    /// Export the finished recording to shared storage.
    ///
    /// At most one save is pending at a time; a newer call drops the
    /// older callback. Failures reach the callback as `Err` on a later
    /// pump, never synchronously.
    pub fn save_preview(&mut self, filename: Option<&str>, callback: SavePreviewCallback) {
        if self.pending_save.replace(callback).is_some() {
            log::warn!("save_preview already pending; dropping the older callback");
        }
        if !self.is_initialised() || !self.service.is_preview_available() {
            self.events
                .emit(ServiceEvent::PreviewSaved(Err(ReplayError::PreviewUnavailable)));
            return;
        }
        if !self.settings.allow_storage_permission {
            self.events.emit(ServiceEvent::PreviewSaved(Err(
                ReplayError::PermissionUnavailable,
            )));
            return;
        }
        self.service.save_preview(filename);
    }

    /// Open the native share sheet for the finished recording. With no
    /// finished recording there is nothing to share and the request is
    /// dropped.
    pub fn share_preview(&mut self, text: Option<&str>, subject: Option<&str>) {
        if !self.is_initialised() || !self.service.is_preview_available() {
            log::error!("share_preview requested with no finished recording");
            return;
        }
        self.service.share_preview(text, subject);
    }

    /// Run one dispatch cycle on the consumer context: due deferred
    /// tasks first, then every adapter event queued so far.
    ///
    /// Returned notifications must be delivered after the caller drops
    /// its session lock; observers may re-enter the session.
    pub fn pump(&mut self, now: Instant) -> Vec<Notification> {
        self.deferred.drain(now);

        let mut notifications = Vec::new();
        for event in self.bridge.drain() {
            if let Some(notification) = self.apply(event) {
                notifications.push(notification);
            }
        }
        notifications
    }

    // --- Internal helpers ---

    /// Fold one adapter event into session state.
    fn apply(&mut self, event: ServiceEvent) -> Option<Notification> {
        match event {
            ServiceEvent::Initialised => {
                self.init_phase = InitialisePhase::Confirmed;
                Some(Notification::Initialise(
                    InitialisationState::Success,
                    String::new(),
                ))
            }
            ServiceEvent::InitialiseFailed(reason) => {
                // A failure unlatches the request so the consumer can retry.
                self.init_phase = InitialisePhase::Idle;
                Some(Notification::Initialise(
                    InitialisationState::Failed(reason.clone()),
                    reason,
                ))
            }
            ServiceEvent::RecordingStarted => {
                if self.phase != RecordingPhase::Starting {
                    log::warn!("recording started from unexpected phase {:?}", self.phase);
                }
                self.phase = RecordingPhase::Started;
                self.finish_duck_cycle();
                Some(Notification::Recording(RecordingState::Started))
            }
            ServiceEvent::RecordingStopped => {
                if self.phase != RecordingPhase::Stopping {
                    log::warn!("recording stopped from unexpected phase {:?}", self.phase);
                }
                self.phase = RecordingPhase::Stopped;
                self.finish_duck_cycle();
                Some(Notification::Recording(RecordingState::Stopped))
            }
            ServiceEvent::RecordingAvailable => {
                // The clip announcement can trail its stop into the next
                // cycle; it must not resolve that cycle's transition.
                if self.phase != RecordingPhase::Stopped {
                    log::warn!("recording available ignored in phase {:?}", self.phase);
                    return None;
                }
                self.phase = RecordingPhase::Available;
                Some(Notification::Recording(RecordingState::Available))
            }
            ServiceEvent::RecordingFailed(reason) => {
                // A failed cycle resets to idle so the consumer can retry.
                // Only an in-flight transition has a duck cycle to resolve.
                if matches!(
                    self.phase,
                    RecordingPhase::Starting | RecordingPhase::Started | RecordingPhase::Stopping
                ) {
                    self.finish_duck_cycle();
                }
                self.phase = RecordingPhase::Idle;
                Some(Notification::Recording(RecordingState::Failed(reason)))
            }
            ServiceEvent::PreviewOpened => {
                self.note_preview(PreviewState::Opened);
                None
            }
            ServiceEvent::PreviewClosed => {
                self.note_preview(PreviewState::Closed);
                None
            }
            ServiceEvent::PreviewPlayed => {
                self.note_preview(PreviewState::Played);
                None
            }
            ServiceEvent::PreviewShared => {
                self.note_preview(PreviewState::Shared);
                None
            }
            ServiceEvent::PreviewSaved(result) => match self.pending_save.take() {
                Some(callback) => Some(Notification::SaveComplete(callback, result)),
                None => {
                    log::warn!("save completion arrived with no pending callback");
                    None
                }
            },
        }
    }

    /// Resolve the ducking cycle opened by the in-flight transition by
    /// scheduling its delayed restore.
    fn finish_duck_cycle(&mut self) {
        if let Some(snapshot) = self.duck_pending.take() {
            self.ducker.schedule_restore(&self.deferred, snapshot);
        }
    }

    fn note_preview(&mut self, state: PreviewState) {
        log::debug!("preview window state: {:?}", state);
        self.last_preview_state = Some(state);
    }
}
