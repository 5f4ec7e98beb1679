use video_capture_core::CaptureBackend;

use crate::device::{WebDeviceProvider, WebStream};
use crate::encoder::WebMediaEncoder;
use crate::surface::VideoElementSurface;
use crate::ticker::IntervalTicker;

/// Browser collaborators for `CaptureController`.
pub struct WebBackend;

impl CaptureBackend for WebBackend {
    type Stream = WebStream;
    type Device = WebDeviceProvider;
    type Encoder = WebMediaEncoder;
    type Ticker = IntervalTicker;
    type Surface = VideoElementSurface;
}

/// Event sink wired to the browser backend.
pub type WebEventSink = crate::dispatch::EventSink<WebBackend>;
