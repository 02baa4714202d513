use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;

use crate::dispatch::deferred::DeferredQueue;
use crate::traits::audio_emitter::AudioEmitter;

/// Delay between a confirmed transition and audio restore, letting the
/// native audio path settle before sources resume.
pub const RESTORE_SETTLE_DELAY: Duration = Duration::from_millis(100);

struct DuckedEntry {
    emitter: Arc<dyn AudioEmitter>,
    position: f64,
}

/// Positions of the sources paused by one ducking cycle.
///
/// Move-only: the holder is the only party allowed to restore it, and
/// restoring consumes it.
pub struct DuckedSnapshot {
    era: u64,
    entries: Vec<DuckedEntry>,
}

impl DuckedSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Pauses registered audio sources around capture transitions and later
/// resumes them at their exact positions. Cloneable handle; clones share
/// the registry.
///
/// Registered handles are held weakly; dropped sources fall out of the
/// registry at the next enumeration. When audio control is disabled in
/// the session settings every operation is a no-op.
///
/// Each `duck_all` opens a new era. A restore whose snapshot belongs to
/// a superseded era parks its entries instead of resuming them (resuming
/// into an in-flight transition would undo the newer cycle); parked
/// entries rejoin the next cycle or resume with the next current-era
/// restore. At any time there is at most one live snapshot, and a paused
/// source survives no further than the next safe restore point.
#[derive(Clone)]
pub struct DuckingCoordinator {
    enabled: bool,
    emitters: Arc<Mutex<Vec<Weak<dyn AudioEmitter>>>>,
    era: Arc<AtomicU64>,
    parked: Arc<Mutex<Vec<DuckedEntry>>>,
}

impl DuckingCoordinator {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            emitters: Arc::new(Mutex::new(Vec::new())),
            era: Arc::new(AtomicU64::new(0)),
            parked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Register a playback handle for ducking. The coordinator keeps a
    /// weak reference only.
    pub fn register(&self, emitter: &Arc<dyn AudioEmitter>) {
        self.emitters.lock().push(Arc::downgrade(emitter));
    }

    /// Pause every currently playing source and snapshot its position.
    ///
    /// Idempotent when nothing is playing: returns an empty snapshot.
    /// Entries parked by a superseded restore are absorbed into the new
    /// snapshot so they resume with this cycle.
    pub fn duck_all(&self) -> DuckedSnapshot {
        if !self.enabled {
            return DuckedSnapshot {
                era: self.era.load(Ordering::SeqCst),
                entries: Vec::new(),
            };
        }

        let era = self.era.fetch_add(1, Ordering::SeqCst) + 1;
        let mut entries: Vec<DuckedEntry> = self.parked.lock().drain(..).collect();

        let mut registry = self.emitters.lock();
        registry.retain(|weak| match weak.upgrade() {
            Some(emitter) => {
                if emitter.is_playing() {
                    let position = emitter.position();
                    emitter.stop();
                    entries.push(DuckedEntry { emitter, position });
                }
                true
            }
            None => false,
        });

        DuckedSnapshot { era, entries }
    }

    /// Re-seek and resume every source in `snapshot`, consuming it.
    ///
    /// A snapshot from a superseded era is parked rather than resumed.
    /// A current-era restore also drains parked entries, so sources
    /// orphaned by an overlapping cycle recover here.
    pub fn restore(&self, snapshot: DuckedSnapshot) {
        if !self.enabled {
            return;
        }

        if snapshot.era != self.era.load(Ordering::SeqCst) {
            if !snapshot.entries.is_empty() {
                log::warn!(
                    "audio restore superseded by a newer ducking cycle; parking {} source(s)",
                    snapshot.entries.len()
                );
                self.parked.lock().extend(snapshot.entries);
            }
            return;
        }

        let parked: Vec<DuckedEntry> = self.parked.lock().drain(..).collect();
        for entry in snapshot.entries.into_iter().chain(parked) {
            entry.emitter.resume(entry.position);
        }
    }

    /// Restore `snapshot` after the settle delay, on the consumer
    /// context.
    ///
    /// Scheduled even for an empty snapshot: a stale restore may park
    /// entries between now and the settle point, and this pass resumes
    /// them.
    pub fn schedule_restore(&self, deferred: &DeferredQueue, snapshot: DuckedSnapshot) {
        if !self.enabled {
            return;
        }
        let coordinator = self.clone();
        deferred.push_delayed(RESTORE_SETTLE_DELAY, move || coordinator.restore(snapshot));
    }
}
