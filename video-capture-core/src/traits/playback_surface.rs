use crate::models::error::CaptureError;

/// The video element the widget renders into.
pub trait PlaybackSurface<S> {
    /// Show the live device feed. The feed plays as soon as it is shown.
    fn show_stream(&mut self, stream: &S);

    /// Show a finished recording by its playback reference, paused.
    ///
    /// Must not start playback; only [`PlaybackSurface::play`] does.
    fn show_source(&mut self, url: &str);

    /// Detach any feed or source.
    fn clear(&mut self);

    fn set_muted(&mut self, muted: bool);

    /// Start playback of the current source. End and pause are reported back as events.
    fn play(&mut self) -> Result<(), CaptureError>;
}
