use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{MediaStream, MediaStreamConstraints, MediaStreamTrack};

use video_capture_core::{AcquireToken, Acquisition, CaptureEvent, DeviceError, DeviceProvider, LiveStream, MediaConstraints};

use crate::backend::WebEventSink;
use crate::js_error::{describe, device_error};

/// A `MediaStream` from `getUserMedia`.
pub struct WebStream {
    stream: MediaStream,
    stopped: bool,
}

impl WebStream {
    pub fn new(stream: MediaStream) -> Self {
        Self { stream, stopped: false }
    }

    pub fn media_stream(&self) -> &MediaStream {
        &self.stream
    }
}

impl LiveStream for WebStream {
    fn id(&self) -> String {
        self.stream.id()
    }

    fn stop_tracks(&mut self) {
        for track in self.stream.get_tracks().iter() {
            track.unchecked_into::<MediaStreamTrack>().stop();
        }
        self.stopped = true;
    }

    fn is_live(&self) -> bool {
        !self.stopped && self.stream.active()
    }
}

/// Camera/microphone access through `navigator.mediaDevices.getUserMedia`.
///
/// Always answers `Pending`; the outcome is posted as a device-acquired event.
pub struct WebDeviceProvider {
    sink: WebEventSink,
}

impl WebDeviceProvider {
    pub fn new(sink: WebEventSink) -> Self {
        Self { sink }
    }
}

impl DeviceProvider for WebDeviceProvider {
    type Stream = WebStream;

    fn request_media(&mut self, constraints: &MediaConstraints, token: AcquireToken) -> Acquisition<WebStream> {
        let Some(window) = web_sys::window() else {
            return Acquisition::Failed(DeviceError::Unavailable("no window".into()));
        };
        let devices = match window.navigator().media_devices() {
            Ok(devices) => devices,
            Err(e) => return Acquisition::Failed(DeviceError::Unavailable(describe(&e))),
        };

        let request = MediaStreamConstraints::new();
        request.set_video(&JsValue::from_bool(constraints.video));
        request.set_audio(&JsValue::from_bool(constraints.audio));

        let promise = match devices.get_user_media_with_constraints(&request) {
            Ok(promise) => promise,
            Err(e) => return Acquisition::Failed(device_error(&e)),
        };

        let sink = self.sink.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match JsFuture::from(promise).await {
                Ok(value) => Ok(WebStream::new(value.unchecked_into::<MediaStream>())),
                Err(e) => Err(device_error(&e)),
            };
            sink.post(CaptureEvent::DeviceAcquired { token, result });
        });

        Acquisition::Pending
    }
}
