use super::state::DeviceStatus;

/// Snapshot of everything the presentation shell renders.
///
/// Derived from controller state after each event; never mutated directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureView {
    pub open: bool,
    pub device: DeviceStatus,
    pub recording: bool,
    pub finalizing: bool,
    pub elapsed_secs: u32,
    pub max_duration_secs: u32,
    pub has_artifact: bool,
    pub is_playing: bool,
    pub can_confirm: bool,
}

impl CaptureView {
    /// Fraction of the duration cap used so far, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.max_duration_secs == 0 {
            return 0.0;
        }
        (self.elapsed_secs as f64 / self.max_duration_secs as f64).min(1.0)
    }

    pub fn is_loading(&self) -> bool {
        self.device.is_acquiring()
    }

    /// A finished recording is on screen instead of the live feed.
    pub fn is_preview_mode(&self) -> bool {
        !self.recording && self.has_artifact
    }

    /// The live feed is shown muted; previews play with sound.
    pub fn is_muted(&self) -> bool {
        !self.is_preview_mode()
    }

    pub fn shows_play_button(&self) -> bool {
        self.is_preview_mode() && !self.is_playing
    }
}
