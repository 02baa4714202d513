use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use replay_core::{NativeService, ReplayError, ServiceContext, ServiceEvent};

use crate::manifest::ClipManifest;

const UNAVAILABLE: &str = "screen recording is not available in this environment";

struct SimInner {
    work_dir: PathBuf,
    save_dir: PathBuf,
    start_latency: Duration,
    stop_latency: Duration,
    api_available: bool,

    recording: AtomicBool,
    microphone_enabled: AtomicBool,
    started_at: Mutex<Option<Instant>>,
    clip: Mutex<Option<PathBuf>>,
    ctx: Mutex<Option<ServiceContext>>,
}

impl SimInner {
    fn context(&self) -> Option<ServiceContext> {
        self.ctx.lock().clone()
    }
}

/// In-process recorder that plays the native side of the session
/// protocol.
///
/// Start and stop run their "native" call at the consumer's next safe
/// point through the deferred queue, the way a real backend waits for a
/// frame boundary. Confirmations then arrive from short-lived worker
/// threads through the event bridge, the way real backend callbacks
/// would. A stopped recording is materialised as a [`ClipManifest`] in
/// `work_dir`; saving copies it into `work_dir/saved`.
pub struct SimulatedService {
    inner: Arc<SimInner>,
}

impl SimulatedService {
    /// Recorder rooted at `work_dir`, confirming transitions without
    /// artificial latency.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self::build(work_dir.into(), true, Duration::ZERO, Duration::ZERO)
    }

    /// Recorder whose environment has no recording API; initialisation
    /// fails and every capability reads as absent.
    pub fn unavailable(work_dir: impl Into<PathBuf>) -> Self {
        Self::build(work_dir.into(), false, Duration::ZERO, Duration::ZERO)
    }

    /// Recorder that waits `start_latency`/`stop_latency` before
    /// confirming transitions, for exercising consumers against slow
    /// devices.
    pub fn with_latencies(
        work_dir: impl Into<PathBuf>,
        start_latency: Duration,
        stop_latency: Duration,
    ) -> Self {
        Self::build(work_dir.into(), true, start_latency, stop_latency)
    }

    fn build(
        work_dir: PathBuf,
        api_available: bool,
        start_latency: Duration,
        stop_latency: Duration,
    ) -> Self {
        let save_dir = work_dir.join("saved");
        Self {
            inner: Arc::new(SimInner {
                work_dir,
                save_dir,
                start_latency,
                stop_latency,
                api_available,
                recording: AtomicBool::new(false),
                microphone_enabled: AtomicBool::new(false),
                started_at: Mutex::new(None),
                clip: Mutex::new(None),
                ctx: Mutex::new(None),
            }),
        }
    }
}

impl NativeService for SimulatedService {
    fn initialise(&mut self, ctx: ServiceContext) {
        if self.inner.api_available {
            log::info!(
                "simulated recorder ready in {}",
                self.inner.work_dir.display()
            );
            ctx.events.emit(ServiceEvent::Initialised);
        } else {
            ctx.events
                .emit(ServiceEvent::InitialiseFailed(UNAVAILABLE.to_string()));
        }
        *self.inner.ctx.lock() = Some(ctx);
    }

    fn is_recording_available(&self) -> bool {
        self.inner.api_available
    }

    fn is_recording(&self) -> bool {
        self.inner.recording.load(Ordering::SeqCst)
    }

    fn is_preview_available(&self) -> bool {
        self.inner.clip.lock().is_some()
    }

    fn is_camera_enabled(&self) -> bool {
        false
    }

    fn start_recording(&mut self, microphone_enabled: bool) {
        if self.inner.recording.load(Ordering::SeqCst) {
            return;
        }
        if !self.inner.api_available {
            if let Some(ctx) = self.inner.context() {
                ctx.events
                    .emit(ServiceEvent::RecordingFailed(UNAVAILABLE.to_string()));
            }
            return;
        }
        let Some(ctx) = self.inner.context() else {
            return;
        };

        self.inner
            .microphone_enabled
            .store(microphone_enabled, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        ctx.deferred.push(move || {
            thread::Builder::new()
                .name("sim-start".into())
                .spawn(move || {
                    thread::sleep(inner.start_latency);
                    let Some(ctx) = inner.context() else {
                        return;
                    };
                    *inner.started_at.lock() = Some(Instant::now());
                    inner.recording.store(true, Ordering::SeqCst);
                    ctx.events.emit(ServiceEvent::RecordingStarted);
                })
                .expect("failed to spawn sim-start thread");
        });
    }

    fn stop_recording(&mut self) {
        if !self.inner.recording.load(Ordering::SeqCst) {
            return;
        }
        let Some(ctx) = self.inner.context() else {
            return;
        };

        let inner = Arc::clone(&self.inner);
        ctx.deferred.push(move || {
            thread::Builder::new()
                .name("sim-stop".into())
                .spawn(move || {
                    thread::sleep(inner.stop_latency);
                    let duration = inner
                        .started_at
                        .lock()
                        .take()
                        .map(|started| started.elapsed().as_secs_f64())
                        .unwrap_or(0.0);
                    inner.recording.store(false, Ordering::SeqCst);

                    let Some(ctx) = inner.context() else {
                        return;
                    };
                    let manifest = ClipManifest::new(
                        duration,
                        inner.microphone_enabled.load(Ordering::SeqCst),
                        &ctx.settings,
                    );
                    let path = inner
                        .work_dir
                        .join(format!("clip_{}.replay.json", manifest.id));
                    let written = fs::create_dir_all(&inner.work_dir)
                        .map_err(|e| {
                            ReplayError::StorageError(format!("failed to create work dir: {}", e))
                        })
                        .and_then(|_| manifest.write(&path));
                    match written {
                        Ok(()) => {
                            *inner.clip.lock() = Some(path);
                            ctx.events.emit(ServiceEvent::RecordingStopped);
                            ctx.events.emit(ServiceEvent::RecordingAvailable);
                        }
                        Err(e) => {
                            log::error!("failed to finalise simulated clip: {}", e);
                            ctx.events.emit(ServiceEvent::RecordingFailed(e.to_string()));
                        }
                    }
                })
                .expect("failed to spawn sim-stop thread");
        });
    }

    fn preview(&mut self) -> bool {
        if self.inner.clip.lock().is_none() {
            return false;
        }
        if let Some(ctx) = self.inner.context() {
            ctx.events.emit(ServiceEvent::PreviewOpened);
        }
        true
    }

    fn discard(&mut self) -> bool {
        match self.inner.clip.lock().take() {
            Some(path) => {
                if let Err(e) = fs::remove_file(&path) {
                    log::warn!("failed to remove discarded clip: {}", e);
                }
                true
            }
            None => false,
        }
    }

    fn preview_file_path(&self) -> Option<String> {
        self.inner
            .clip
            .lock()
            .as_ref()
            .map(|path| path.to_string_lossy().into_owned())
    }

    fn save_preview(&mut self, filename: Option<&str>) {
        let Some(ctx) = self.inner.context() else {
            return;
        };
        let clip = self.inner.clip.lock().clone();
        let Some(clip) = clip else {
            ctx.events
                .emit(ServiceEvent::PreviewSaved(Err(ReplayError::PreviewUnavailable)));
            return;
        };
        // A real backend re-checks its storage grant at the OS boundary.
        if !ctx.settings.allow_storage_permission {
            ctx.events.emit(ServiceEvent::PreviewSaved(Err(
                ReplayError::PermissionUnavailable,
            )));
            return;
        }

        let file_name = match filename {
            Some(name) => format!("{}.replay.json", name),
            None => clip
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "clip.replay.json".to_string()),
        };

        let inner = Arc::clone(&self.inner);
        thread::Builder::new()
            .name("sim-save".into())
            .spawn(move || {
                let Some(ctx) = inner.context() else {
                    return;
                };
                let destination = inner.save_dir.join(file_name);
                let copied = fs::create_dir_all(&inner.save_dir)
                    .and_then(|_| fs::copy(&clip, &destination).map(|_| ()))
                    .map_err(|e| {
                        ReplayError::StorageError(format!("failed to export clip: {}", e))
                    });
                ctx.events.emit(ServiceEvent::PreviewSaved(copied));
            })
            .expect("failed to spawn sim-save thread");
    }

    fn share_preview(&mut self, text: Option<&str>, subject: Option<&str>) {
        if self.inner.clip.lock().is_none() {
            log::error!("no finished clip to share");
            return;
        }
        log::debug!(
            "simulated share sheet: text={:?} subject={:?}",
            text,
            subject
        );
        if let Some(ctx) = self.inner.context() {
            ctx.events.emit(ServiceEvent::PreviewShared);
        }
    }
}
