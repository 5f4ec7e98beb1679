use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::media::{MediaConstraints, DEFAULT_MIME_PREFERENCES, FALLBACK_MIME_TYPE};

/// Configuration for a capture controller.
///
/// Deserializable so a host can pass it straight from JSON; missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfiguration {
    /// Hard recording cap in seconds (default: 180).
    pub max_duration_secs: u32,

    /// Elapsed-time tick period in milliseconds (default: 1000).
    pub tick_interval_ms: u64,

    /// Codec/container combinations, most preferred first.
    pub mime_preferences: Vec<String>,

    /// Artifact mime type when none of the preferences is supported.
    pub fallback_mime_type: String,

    /// Device inputs to request (default: video + audio).
    pub constraints: MediaConstraints,

    /// Ask the encoder for a chunk every N milliseconds. `None` means a
    /// single chunk delivered at stop.
    pub timeslice_ms: Option<u64>,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration_secs == 0 {
            return Err("max duration must be positive".into());
        }
        if self.tick_interval_ms == 0 {
            return Err("tick interval must be positive".into());
        }
        if self.timeslice_ms == Some(0) {
            return Err("timeslice must be positive when set".into());
        }
        if self.fallback_mime_type.trim().is_empty() {
            return Err("fallback mime type must not be empty".into());
        }
        if !self.constraints.video && !self.constraints.audio {
            return Err("at least one of video or audio must be requested".into());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn timeslice(&self) -> Option<Duration> {
        self.timeslice_ms.map(Duration::from_millis)
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            max_duration_secs: 180,
            tick_interval_ms: 1000,
            mime_preferences: DEFAULT_MIME_PREFERENCES.iter().map(|m| m.to_string()).collect(),
            fallback_mime_type: FALLBACK_MIME_TYPE.to_string(),
            constraints: MediaConstraints::default(),
            timeslice_ms: None,
        }
    }
}
