use crate::models::error::DeviceError;
use crate::models::media::EncodedChunk;
use crate::traits::device_provider::AcquireToken;
use crate::traits::tick_source::TimerToken;

/// Everything that can happen to a capture controller.
///
/// User intents from the presentation shell and callbacks from the platform
/// (device, encoder, timer, playback surface) all arrive as one of these and
/// are applied in order by `CaptureController::handle`.
#[derive(Debug)]
pub enum CaptureEvent<S> {
    // -- Intents --
    OpenCapture,
    CloseCapture,
    ToggleRecording,
    PlayPreview,
    ConfirmVideo,
    DiscardVideo,

    // -- Platform callbacks --
    DeviceAcquired {
        token: AcquireToken,
        result: Result<S, DeviceError>,
    },
    Chunk(EncodedChunk),
    EncoderStopped,
    Tick(TimerToken),
    PlaybackPaused,
    PlaybackEnded,
}
