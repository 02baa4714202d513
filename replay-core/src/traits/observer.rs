use crate::models::state::{InitialisationState, RecordingState};

/// Consumer-facing notifications from a replay session.
///
/// Methods are called on the consumer's own context during `pump()`,
/// never while an internal lock is held. Subscribe before calling
/// `initialise` so no notification is missed; nothing is replayed to
/// late subscribers.
pub trait ReplayObserver: Send + Sync {
    /// Initialisation outcome. `note` carries informational text: the
    /// failure reason on a failed initialise, "already initialised" on
    /// repeated calls, empty on first success.
    fn on_initialise(&self, state: &InitialisationState, note: &str);

    /// A recording-cycle state was announced.
    fn on_recording_state_changed(&self, state: &RecordingState);
}
