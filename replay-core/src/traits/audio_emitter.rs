/// A playback handle the ducking coordinator may pause and resume.
///
/// Implemented by the consumer for whatever audio engine it uses; the
/// coordinator only needs position-preserving stop and resume. Methods
/// run while the session is mid-transition (or inside its pump), so
/// implementations must not call back into the session.
pub trait AudioEmitter: Send + Sync {
    /// Whether the source is currently audible.
    fn is_playing(&self) -> bool;

    /// Current playback position in seconds.
    fn position(&self) -> f64;

    /// Stop playback, keeping the source seekable.
    fn stop(&self);

    /// Seek to `position` (seconds) and resume playback.
    fn resume(&self, position: f64);
}
