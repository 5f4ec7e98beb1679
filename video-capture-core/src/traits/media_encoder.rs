use std::time::Duration;

use crate::models::error::CaptureError;

/// Platform-specific chunked media encoder (a `MediaRecorder` in a browser).
///
/// Encoded chunks and the stop acknowledgment are delivered back to the
/// controller as events, never through this trait.
pub trait MediaEncoder<S> {
    /// Whether the encoder can produce `mime_type`.
    fn is_type_supported(&self, mime_type: &str) -> bool;

    /// Begin encoding `stream`. `None` lets the encoder pick its default container.
    fn start(
        &mut self,
        stream: &S,
        mime_type: Option<&str>,
        timeslice: Option<Duration>,
    ) -> Result<(), CaptureError>;

    /// Request a stop. The encoder flushes remaining data, then acknowledges.
    fn stop(&mut self) -> Result<(), CaptureError>;
}
