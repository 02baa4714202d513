//! Shared test doubles: a scriptable native adapter, a collecting
//! observer, and a controllable audio emitter.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::events::ServiceEvent;
use crate::models::state::{InitialisationState, RecordingState};
use crate::traits::audio_emitter::AudioEmitter;
use crate::traits::native_service::{NativeService, ServiceContext};
use crate::traits::observer::ReplayObserver;

struct ScriptedShared {
    auto_respond: bool,
    calls: Mutex<Vec<String>>,
    ctx: Mutex<Option<ServiceContext>>,
    fail_next_initialise: AtomicBool,
    recording: AtomicBool,
    preview_available: AtomicBool,
    clip_path: Mutex<Option<String>>,
    clip_counter: AtomicUsize,
}

/// Scriptable [`NativeService`] double.
///
/// Clones share state: move one clone into the session and keep the
/// other as the test handle. In auto mode every call answers with the
/// event a well-behaved recorder would produce; in manual mode the test
/// drives responses through [`respond`](Self::respond).
#[derive(Clone)]
pub(crate) struct ScriptedService {
    shared: Arc<ScriptedShared>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::with_mode(true)
    }

    pub(crate) fn manual() -> Self {
        Self::with_mode(false)
    }

    fn with_mode(auto_respond: bool) -> Self {
        Self {
            shared: Arc::new(ScriptedShared {
                auto_respond,
                calls: Mutex::new(Vec::new()),
                ctx: Mutex::new(None),
                fail_next_initialise: AtomicBool::new(false),
                recording: AtomicBool::new(false),
                preview_available: AtomicBool::new(false),
                clip_path: Mutex::new(None),
                clip_counter: AtomicUsize::new(0),
            }),
        }
    }

    pub(crate) fn calls_named(&self, name: &str) -> usize {
        self.shared
            .calls
            .lock()
            .iter()
            .filter(|call| call.as_str() == name)
            .count()
    }

    pub(crate) fn fail_next_initialise(&self) {
        self.shared.fail_next_initialise.store(true, Ordering::SeqCst);
    }

    /// Emit an event the way the native layer would.
    pub(crate) fn respond(&self, event: ServiceEvent) {
        self.shared
            .ctx
            .lock()
            .as_ref()
            .expect("service was never initialised")
            .events
            .emit(event);
    }

    fn record(&self, call: impl Into<String>) {
        self.shared.calls.lock().push(call.into());
    }

    fn respond_auto(&self, event: ServiceEvent) {
        if self.shared.auto_respond {
            self.respond(event);
        }
    }
}

impl NativeService for ScriptedService {
    fn initialise(&mut self, ctx: ServiceContext) {
        self.record("initialise");
        *self.shared.ctx.lock() = Some(ctx);
        if self.shared.fail_next_initialise.swap(false, Ordering::SeqCst) {
            self.respond_auto(ServiceEvent::InitialiseFailed(
                "scripted initialise failure".to_string(),
            ));
        } else {
            self.respond_auto(ServiceEvent::Initialised);
        }
    }

    fn is_recording_available(&self) -> bool {
        true
    }

    fn is_recording(&self) -> bool {
        self.shared.recording.load(Ordering::SeqCst)
    }

    fn is_preview_available(&self) -> bool {
        self.shared.preview_available.load(Ordering::SeqCst)
    }

    fn is_camera_enabled(&self) -> bool {
        false
    }

    fn start_recording(&mut self, microphone_enabled: bool) {
        self.record(format!("start_recording({})", microphone_enabled));
        if self.shared.auto_respond {
            self.shared.recording.store(true, Ordering::SeqCst);
            self.respond(ServiceEvent::RecordingStarted);
        }
    }

    fn stop_recording(&mut self) {
        self.record("stop_recording");
        if self.shared.auto_respond {
            self.shared.recording.store(false, Ordering::SeqCst);
            self.shared.preview_available.store(true, Ordering::SeqCst);
            let clip = self.shared.clip_counter.fetch_add(1, Ordering::SeqCst) + 1;
            *self.shared.clip_path.lock() = Some(format!("replay://clip-{}", clip));
            self.respond(ServiceEvent::RecordingStopped);
            self.respond(ServiceEvent::RecordingAvailable);
        }
    }

    fn preview(&mut self) -> bool {
        self.record("preview");
        if !self.shared.preview_available.load(Ordering::SeqCst) {
            return false;
        }
        self.respond_auto(ServiceEvent::PreviewOpened);
        true
    }

    fn discard(&mut self) -> bool {
        self.record("discard");
        if self.shared.preview_available.swap(false, Ordering::SeqCst) {
            *self.shared.clip_path.lock() = None;
            true
        } else {
            false
        }
    }

    fn preview_file_path(&self) -> Option<String> {
        self.shared.clip_path.lock().clone()
    }

    fn save_preview(&mut self, filename: Option<&str>) {
        self.record(format!("save_preview({:?})", filename));
        self.respond_auto(ServiceEvent::PreviewSaved(Ok(())));
    }

    fn share_preview(&mut self, _text: Option<&str>, _subject: Option<&str>) {
        self.record("share_preview");
        self.respond_auto(ServiceEvent::PreviewShared);
    }
}

/// Observer that records every announcement it receives.
#[derive(Default)]
pub(crate) struct CollectingObserver {
    initialise_events: Mutex<Vec<(InitialisationState, String)>>,
    recording_events: Mutex<Vec<RecordingState>>,
}

impl CollectingObserver {
    pub(crate) fn initialise_events(&self) -> Vec<(InitialisationState, String)> {
        self.initialise_events.lock().clone()
    }

    pub(crate) fn recording_events(&self) -> Vec<RecordingState> {
        self.recording_events.lock().clone()
    }
}

impl ReplayObserver for CollectingObserver {
    fn on_initialise(&self, state: &InitialisationState, note: &str) {
        self.initialise_events
            .lock()
            .push((state.clone(), note.to_string()));
    }

    fn on_recording_state_changed(&self, state: &RecordingState) {
        self.recording_events.lock().push(state.clone());
    }
}

/// Audio emitter double with an observable play state.
pub(crate) struct TestEmitter {
    playing: AtomicBool,
    position: Mutex<f64>,
    stop_calls: AtomicUsize,
    resume_calls: AtomicUsize,
}

impl TestEmitter {
    fn with_state(position: f64, playing: bool) -> Arc<Self> {
        Arc::new(Self {
            playing: AtomicBool::new(playing),
            position: Mutex::new(position),
            stop_calls: AtomicUsize::new(0),
            resume_calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn playing_at(position: f64) -> Arc<Self> {
        Self::with_state(position, true)
    }

    pub(crate) fn silent() -> Arc<Self> {
        Self::with_state(0.0, false)
    }

    pub(crate) fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn resume_count(&self) -> usize {
        self.resume_calls.load(Ordering::SeqCst)
    }
}

impl AudioEmitter for TestEmitter {
    fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    fn position(&self) -> f64 {
        *self.position.lock()
    }

    fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }

    fn resume(&self, position: f64) {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        *self.position.lock() = position;
        self.playing.store(true, Ordering::SeqCst);
    }
}
