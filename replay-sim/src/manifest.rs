use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use replay_core::{ReplayError, ReplaySettings, VideoQuality};

/// Description of one simulated clip, stored as a JSON file in the
/// session's working directory. Stands in for the video container a
/// real backend would produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipManifest {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub microphone_enabled: bool,
    pub max_quality: VideoQuality,
    pub bitrate_factor: Option<f32>,
}

impl ClipManifest {
    pub fn new(duration_secs: f64, microphone_enabled: bool, settings: &ReplaySettings) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recorded_at: Utc::now(),
            duration_secs,
            microphone_enabled,
            max_quality: settings.max_quality,
            bitrate_factor: settings.bitrate_factor,
        }
    }

    /// Write the manifest as pretty JSON at `path`.
    pub fn write(&self, path: &Path) -> Result<(), ReplayError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            ReplayError::StorageError(format!("failed to serialize manifest: {}", e))
        })?;
        fs::write(path, json)
            .map_err(|e| ReplayError::StorageError(format!("failed to write manifest: {}", e)))?;
        Ok(())
    }

    /// Read a manifest from `path`.
    pub fn read(path: &Path) -> Result<Self, ReplayError> {
        let json = fs::read_to_string(path)
            .map_err(|e| ReplayError::StorageError(format!("failed to read manifest: {}", e)))?;
        let manifest: Self = serde_json::from_str(&json)
            .map_err(|e| ReplayError::StorageError(format!("failed to parse manifest: {}", e)))?;
        Ok(manifest)
    }
}
