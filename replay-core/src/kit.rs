use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::config::ReplaySettings;
use crate::models::error::ReplayError;
use crate::models::state::RecordingPhase;
use crate::platform::unsupported::UnsupportedService;
use crate::platform::Platform;
use crate::session::controller::{Notification, SessionController};
use crate::traits::audio_emitter::AudioEmitter;
use crate::traits::native_service::NativeService;
use crate::traits::observer::ReplayObserver;

struct KitInner {
    controller: Mutex<SessionController>,
    observers: Mutex<Vec<Arc<dyn ReplayObserver>>>,
}

/// Thread-safe consumer facade over one replay session.
///
/// Cheap to clone; clones share the session. Mutating calls forward to
/// the session controller under its lock, and `pump` delivers queued
/// announcements with the lock released, so an observer may call back
/// into the kit.
#[derive(Clone)]
pub struct ReplayKit {
    inner: Arc<KitInner>,
}

impl ReplayKit {
    /// Wrap `service` in a session driven by `settings`.
    pub fn new(service: Box<dyn NativeService>, settings: ReplaySettings) -> Self {
        if let Err(reason) = settings.validate() {
            log::warn!("replay settings failed validation: {}", reason);
        }
        Self {
            inner: Arc::new(KitInner {
                controller: Mutex::new(SessionController::new(service, settings)),
                observers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn builder() -> ReplayKitBuilder {
        ReplayKitBuilder::new()
    }

    /// Subscribe to initialisation and recording announcements.
    ///
    /// Subscribe before calling [`initialise`](Self::initialise):
    /// announcements delivered earlier are not replayed.
    pub fn subscribe(&self, observer: Arc<dyn ReplayObserver>) {
        self.inner.observers.lock().push(observer);
    }

    /// Register a playback source to be paused around capture
    /// transitions.
    pub fn register_audio_emitter(&self, emitter: Arc<dyn AudioEmitter>) {
        self.inner.controller.lock().ducking().register(&emitter);
    }

    /// Initialise the underlying adapter. The outcome arrives through
    /// observers on a later [`pump`](Self::pump), except the
    /// already-initialised re-announcement, which is delivered before
    /// this call returns.
    pub fn initialise(&self) {
        let reannounce = self.inner.controller.lock().initialise();
        if let Some(notification) = reannounce {
            self.deliver(notification);
        }
    }

    /// Drain adapter events and scheduled work, then deliver the
    /// resulting announcements. Call regularly from the consumer's
    /// update loop; callbacks fire on the calling thread.
    pub fn pump(&self) {
        let notifications = self.inner.controller.lock().pump(Instant::now());
        for notification in notifications {
            self.deliver(notification);
        }
    }

    pub fn is_initialised(&self) -> bool {
        self.inner.controller.lock().is_initialised()
    }

    pub fn is_recording_available(&self) -> bool {
        self.inner.controller.lock().is_recording_available()
    }

    pub fn is_recording(&self) -> bool {
        self.inner.controller.lock().is_recording()
    }

    pub fn is_preview_available(&self) -> bool {
        self.inner.controller.lock().is_preview_available()
    }

    pub fn is_camera_enabled(&self) -> bool {
        self.inner.controller.lock().is_camera_enabled()
    }

    pub fn recording_phase(&self) -> RecordingPhase {
        self.inner.controller.lock().recording_phase()
    }

    pub fn is_microphone_enabled(&self) -> bool {
        self.inner.controller.lock().is_microphone_enabled()
    }

    pub fn start_recording(&self, microphone_enabled: bool) {
        self.inner.controller.lock().start_recording(microphone_enabled);
    }

    pub fn stop_recording(&self) {
        self.inner.controller.lock().stop_recording();
    }

    /// Open the native preview window over the finished recording.
    pub fn preview(&self) -> bool {
        self.inner.controller.lock().preview()
    }

    /// Discard the finished recording.
    pub fn discard(&self) -> bool {
        self.inner.controller.lock().discard()
    }

    pub fn preview_file_path(&self) -> Option<String> {
        self.inner.controller.lock().preview_file_path()
    }

    /// Export the finished recording to shared storage. `callback` fires
    /// on a later `pump`, unless a newer save replaces it first.
    pub fn save_preview(
        &self,
        filename: Option<&str>,
        callback: impl FnOnce(Result<(), ReplayError>) + Send + 'static,
    ) {
        self.inner
            .controller
            .lock()
            .save_preview(filename, Box::new(callback));
    }

    /// Open the native share sheet for the finished recording.
    pub fn share_preview(&self, text: Option<&str>, subject: Option<&str>) {
        self.inner.controller.lock().share_preview(text, subject);
    }

    // --- Internal helpers ---

    /// Deliver one announcement. Must be called without the session
    /// lock held.
    fn deliver(&self, notification: Notification) {
        match notification {
            Notification::Initialise(state, note) => {
                for observer in self.observers_snapshot() {
                    observer.on_initialise(&state, &note);
                }
            }
            Notification::Recording(state) => {
                for observer in self.observers_snapshot() {
                    observer.on_recording_state_changed(&state);
                }
            }
            Notification::SaveComplete(callback, result) => callback(result),
        }
    }

    fn observers_snapshot(&self) -> Vec<Arc<dyn ReplayObserver>> {
        self.inner.observers.lock().clone()
    }
}

type ServiceFactory = Box<dyn FnOnce() -> Box<dyn NativeService>>;

/// Builder that picks the native backend for the running platform.
///
/// A platform with no registered backend gets [`UnsupportedService`],
/// which announces every operation as unavailable instead of failing
/// construction.
pub struct ReplayKitBuilder {
    settings: ReplaySettings,
    backends: Vec<(Platform, ServiceFactory)>,
}

impl ReplayKitBuilder {
    pub fn new() -> Self {
        Self {
            settings: ReplaySettings::default(),
            backends: Vec::new(),
        }
    }

    pub fn settings(mut self, settings: ReplaySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Register the backend to construct when running on `platform`.
    pub fn backend(
        mut self,
        platform: Platform,
        factory: impl FnOnce() -> Box<dyn NativeService> + 'static,
    ) -> Self {
        self.backends.push((platform, Box::new(factory)));
        self
    }

    /// Build for the platform this binary runs on.
    pub fn build(self) -> ReplayKit {
        self.build_for(Platform::detect())
    }

    /// Build for an explicit platform.
    pub fn build_for(mut self, platform: Platform) -> ReplayKit {
        let service: Box<dyn NativeService> = match self
            .backends
            .iter()
            .position(|(candidate, _)| *candidate == platform)
        {
            Some(index) => {
                let (_, factory) = self.backends.swap_remove(index);
                factory()
            }
            None => {
                log::warn!("no replay backend registered for {}", platform);
                Box::new(UnsupportedService::new(platform))
            }
        };
        ReplayKit::new(service, self.settings)
    }
}

impl Default for ReplayKitBuilder {
    fn default() -> Self {
        Self::new()
    }
}
