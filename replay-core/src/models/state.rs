/// Outcome of adapter initialisation.
///
/// Announced at most meaningfully once per session: the first
/// `initialise()` reports whatever the adapter decided, and repeat calls
/// re-announce `Success` with an informational note instead of touching
/// the adapter again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialisationState {
    Success,
    Failed(String),
}

impl InitialisationState {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure reason, if initialisation failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            Self::Success => None,
        }
    }
}

/// Announced states of one recording cycle.
///
/// `Failed` carries the adapter's human-readable reason, forwarded
/// verbatim. `Available` follows `Stopped` once post-processing of the
/// clip has finished and a preview can be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    Started,
    Stopped,
    Available,
    Failed(String),
}

impl RecordingState {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The failure reason, if the cycle failed.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Controller-internal position in the capture cycle.
///
/// Phase transitions:
/// ```text
/// idle → starting → started → stopping → stopped → available
///          ↓           ↓          ↓
///        (a failure announcement returns the phase to idle)
/// ```
///
/// A new recording may begin from `Idle`, `Stopped`, or `Available`;
/// a failure returns the phase to `Idle` so a consumer-driven retry is
/// a fresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingPhase {
    Idle,
    Starting,
    Started,
    Stopping,
    Stopped,
    Available,
}

impl RecordingPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a start request is accepted in this phase.
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Available)
    }

    /// Whether a stop request is accepted in this phase.
    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// Preview sub-lifecycle, valid only once a recording is `Available`.
///
/// Tracked internally for future exposure; not yet part of the observer
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Opened,
    Closed,
    Played,
    Shared,
}
