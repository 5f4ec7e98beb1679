use thiserror::Error;

/// Failures reported by the camera/microphone acquisition boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("camera or microphone permission denied")]
    PermissionDenied,

    #[error("capture device unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while driving a capture session.
///
/// Variants for which [`CaptureError::is_guard`] returns `true` are guarded
/// no-ops: the operation was rejected, state is untouched, and the failure is
/// only logged. Nothing here is fatal to the host application.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("device stream is still being acquired")]
    DeviceNotReady,

    #[error("no live device stream to record from")]
    StartWithoutStream,

    #[error("recording already in progress")]
    AlreadyRecording,

    #[error("previous recording is still being finalized")]
    StillFinalizing,

    #[error("no active recording to stop")]
    StopWithoutActiveRecording,

    #[error("no recorded video is held")]
    NoArtifact,

    #[error("recorded video is empty, nothing to confirm")]
    EmptyArtifactConfirm,

    #[error("recorded video is empty")]
    EmptyArtifact,

    #[error("preview playback is not available")]
    PlaybackUnavailable,

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("playback handle failed: {0}")]
    HandleFailed(String),

    #[error("timer failed: {0}")]
    TimerFailed(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl CaptureError {
    /// Whether this error is a rejected intent rather than a real failure.
    pub fn is_guard(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotReady
                | Self::StartWithoutStream
                | Self::AlreadyRecording
                | Self::StillFinalizing
                | Self::StopWithoutActiveRecording
                | Self::NoArtifact
                | Self::EmptyArtifactConfirm
                | Self::PlaybackUnavailable
        )
    }

    /// Whether the user must be told capture cannot proceed.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Device(_))
    }
}
