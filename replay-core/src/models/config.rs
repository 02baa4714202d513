use serde::{Deserialize, Serialize};

/// Upper bound on the recording resolution a backend may pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoQuality {
    #[serde(rename = "480p")]
    Q480p,
    #[serde(rename = "720p")]
    Q720p,
    #[serde(rename = "1080p")]
    Q1080p,
}

/// Immutable settings snapshot consumed by a replay session.
///
/// Read once at construction and handed to the adapter as part of its
/// context; the core neither persists nor edits it. Serializable so a
/// consumer can store it however it likes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplaySettings {
    /// Pause other audio playback around start/stop transitions (default: true).
    pub control_audio: bool,

    /// Prefer app audio over microphone input when both are captured
    /// (default: false).
    pub prioritise_app_audio: bool,

    /// Maximum recording quality (default: 720p).
    pub max_quality: VideoQuality,

    /// Bitrate multiplier relative to the platform default
    /// (None = let the platform decide).
    pub bitrate_factor: Option<f32>,

    /// Whether the app has opted into external-storage access for saving
    /// previews (default: true).
    pub allow_storage_permission: bool,
}

impl ReplaySettings {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(factor) = self.bitrate_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(format!(
                    "bitrate factor must be positive and finite: {}",
                    factor
                ));
            }
        }
        Ok(())
    }
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            control_audio: true,
            prioritise_app_audio: false,
            max_quality: VideoQuality::Q720p,
            bitrate_factor: None,
            allow_storage_permission: true,
        }
    }
}
