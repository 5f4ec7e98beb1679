use super::device_provider::{DeviceProvider, LiveStream};
use super::media_encoder::MediaEncoder;
use super::playback_surface::PlaybackSurface;
use super::tick_source::TickSource;

/// Bundles the platform collaborators a `CaptureController` drives.
///
/// Implemented by a marker type per platform:
/// - `WebBackend` (browser, in `video-capture-web`)
/// - test fakes
pub trait CaptureBackend {
    type Stream: LiveStream;
    type Device: DeviceProvider<Stream = Self::Stream>;
    type Encoder: MediaEncoder<Self::Stream>;
    type Ticker: TickSource;
    type Surface: PlaybackSurface<Self::Stream>;
}
