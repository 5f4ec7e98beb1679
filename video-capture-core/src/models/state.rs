use super::error::DeviceError;

/// Lifecycle of the camera/microphone stream.
///
/// ```text
/// inactive → acquiring → ready
///                ↓
///             failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    /// Never acquired, or released.
    #[default]
    Inactive,
    Acquiring,
    Ready,
    Failed(DeviceError),
}

impl DeviceStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(self, Self::Acquiring)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Recording state machine.
///
/// State transitions:
/// ```text
/// idle → recording → finalizing → stopped
///   ↑        ↑                       │
///   └────────┴───────────────────────┘
/// ```
///
/// `Finalizing` waits for the encoder's stop acknowledgment so the last
/// flushed chunk lands in the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording { elapsed_secs: u32 },
    Finalizing { duration_secs: u32 },
    Stopped,
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_finalizing(&self) -> bool {
        matches!(self, Self::Finalizing { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Seconds elapsed in the current recording, zero outside `Recording`.
    pub fn elapsed_secs(&self) -> u32 {
        match self {
            Self::Recording { elapsed_secs } => *elapsed_secs,
            _ => 0,
        }
    }
}
