use crate::models::error::DeviceError;
use crate::models::media::MediaConstraints;

/// Identifies one acquisition request so late completions can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AcquireToken(pub u64);

/// A live camera/microphone stream.
pub trait LiveStream {
    /// Backend identifier, used for logging.
    fn id(&self) -> String;

    /// Stop every underlying track. Must be safe to call more than once.
    fn stop_tracks(&mut self);

    /// Whether any track is still producing media.
    fn is_live(&self) -> bool;
}

/// Outcome of a device request.
#[derive(Debug)]
pub enum Acquisition<S> {
    Ready(S),
    Failed(DeviceError),
    /// The answer arrives later as a device-acquired event carrying the same token.
    Pending,
}

/// Platform-specific camera/microphone acquisition.
pub trait DeviceProvider {
    type Stream: LiveStream;

    /// Request a combined audio/video stream.
    ///
    /// Synchronous backends answer with `Ready`/`Failed`; asynchronous ones
    /// return `Pending` and report back with `token`.
    fn request_media(
        &mut self,
        constraints: &MediaConstraints,
        token: AcquireToken,
    ) -> Acquisition<Self::Stream>;
}
