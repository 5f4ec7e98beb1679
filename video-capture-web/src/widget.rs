use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use js_sys::{Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

use video_capture_core::{
    CaptureConfiguration, CaptureController, CaptureDelegate, CaptureError, CaptureEvent, CaptureParts, CaptureView,
    DeviceStatus, VideoSource,
};

use crate::backend::{WebBackend, WebEventSink};
use crate::device::{WebDeviceProvider, WebStream};
use crate::dispatch::SharedController;
use crate::encoder::WebMediaEncoder;
use crate::handles::ObjectUrlStore;
use crate::surface::VideoElementSurface;
use crate::ticker::IntervalTicker;

/// A capture controller mounted on a `<video>` element.
///
/// Every intent goes through the event sink, so intents issued from inside
/// delegate callbacks are applied after the current event.
pub struct CaptureWidget {
    controller: SharedController<WebBackend>,
    sink: WebEventSink,
}

impl CaptureWidget {
    pub fn mount<F>(element: HtmlVideoElement, config: CaptureConfiguration, on_video: F) -> Result<Self, CaptureError>
    where
        F: FnMut(VideoSource) + 'static,
    {
        let sink = WebEventSink::new();
        let parts = CaptureParts {
            device: WebDeviceProvider::new(sink.clone()),
            encoder: WebMediaEncoder::new(sink.clone()),
            ticker: IntervalTicker::new(sink.clone()),
            surface: VideoElementSurface::new(element, sink.clone())?,
            handles: Arc::new(ObjectUrlStore),
        };
        let controller = Rc::new(RefCell::new(CaptureController::new(config, parts, on_video)?));
        sink.attach(&controller);
        Ok(Self { controller, sink })
    }

    pub fn set_delegate(&self, delegate: Arc<dyn CaptureDelegate>) {
        match self.controller.try_borrow_mut() {
            Ok(mut controller) => controller.set_delegate(delegate),
            Err(_) => log::warn!("delegate not installed: controller is handling an event"),
        }
    }

    pub fn post(&self, event: CaptureEvent<WebStream>) {
        self.sink.post(event);
    }

    /// Current view, unless the controller is mid-event.
    pub fn view(&self) -> Option<CaptureView> {
        self.controller.try_borrow().ok().map(|c| c.view())
    }
}

/// Forwards controller notifications to JavaScript callbacks.
struct JsDelegate {
    view: Rc<RefCell<Option<CaptureView>>>,
    on_change: Function,
    on_error: Option<Function>,
    on_closed: Option<Function>,
}

impl CaptureDelegate for JsDelegate {
    fn on_view_changed(&self, view: &CaptureView) {
        *self.view.borrow_mut() = Some(view.clone());
        if let Err(e) = self.on_change.call0(&JsValue::NULL) {
            log::error!("view callback threw: {:?}", e);
        }
    }

    fn on_error(&self, error: &CaptureError) {
        if let Some(ref callback) = self.on_error {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&error.to_string())) {
                log::error!("error callback threw: {:?}", e);
            }
        }
    }

    fn on_closed(&self) {
        if let Some(ref callback) = self.on_closed {
            if let Err(e) = callback.call0(&JsValue::NULL) {
                log::error!("close callback threw: {:?}", e);
            }
        }
    }
}

fn source_to_js(source: &VideoSource) -> Result<JsValue, JsValue> {
    let object = Object::new();
    Reflect::set(&object, &"url".into(), &source.url.as_str().into())?;
    Reflect::set(&object, &"mimeType".into(), &source.mime_type.as_str().into())?;
    Reflect::set(&object, &"sizeBytes".into(), &(source.size_bytes as f64).into())?;
    Reflect::set(&object, &"durationSecs".into(), &source.duration_secs.into())?;
    Ok(object.into())
}

/// JavaScript handle for the capture widget.
///
/// Render from the getters whenever `onChange` fires.
#[wasm_bindgen]
pub struct VideoCapture {
    widget: CaptureWidget,
    view: Rc<RefCell<Option<CaptureView>>>,
}

#[wasm_bindgen]
impl VideoCapture {
    /// `config` is optional JSON for `CaptureConfiguration` (camelCase keys).
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: HtmlVideoElement,
        on_video: Function,
        on_change: Function,
        on_error: Option<Function>,
        on_closed: Option<Function>,
        config: Option<String>,
    ) -> Result<VideoCapture, JsValue> {
        let config = match config {
            Some(json) => serde_json::from_str::<CaptureConfiguration>(&json)
                .map_err(|e| JsValue::from_str(&format!("invalid capture configuration: {}", e)))?,
            None => CaptureConfiguration::default(),
        };

        let widget = CaptureWidget::mount(element, config, move |source| match source_to_js(&source) {
            Ok(value) => {
                if let Err(e) = on_video.call1(&JsValue::NULL, &value) {
                    log::error!("video callback threw: {:?}", e);
                }
            }
            Err(e) => log::error!("failed to build video source: {:?}", e),
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let view = Rc::new(RefCell::new(widget.view()));
        #[allow(clippy::arc_with_non_send_sync)]
        widget.set_delegate(Arc::new(JsDelegate {
            view: Rc::clone(&view),
            on_change,
            on_error,
            on_closed,
        }));
        Ok(Self { widget, view })
    }

    pub fn open(&self) {
        self.widget.post(CaptureEvent::OpenCapture);
    }

    pub fn close(&self) {
        self.widget.post(CaptureEvent::CloseCapture);
    }

    #[wasm_bindgen(js_name = toggleRecording)]
    pub fn toggle_recording(&self) {
        self.widget.post(CaptureEvent::ToggleRecording);
    }

    pub fn play(&self) {
        self.widget.post(CaptureEvent::PlayPreview);
    }

    pub fn confirm(&self) {
        self.widget.post(CaptureEvent::ConfirmVideo);
    }

    pub fn discard(&self) {
        self.widget.post(CaptureEvent::DiscardVideo);
    }

    fn read<T>(&self, f: impl FnOnce(&CaptureView) -> T) -> Option<T> {
        self.view.borrow().as_ref().map(f)
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.read(|v| v.open).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.read(CaptureView::is_loading).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = isRecording)]
    pub fn is_recording(&self) -> bool {
        self.read(|v| v.recording).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = isPreviewMode)]
    pub fn is_preview_mode(&self) -> bool {
        self.read(CaptureView::is_preview_mode).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.read(CaptureView::is_muted).unwrap_or(true)
    }

    #[wasm_bindgen(getter, js_name = showsPlayButton)]
    pub fn shows_play_button(&self) -> bool {
        self.read(CaptureView::shows_play_button).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = canConfirm)]
    pub fn can_confirm(&self) -> bool {
        self.read(|v| v.can_confirm).unwrap_or(false)
    }

    #[wasm_bindgen(getter, js_name = elapsedSecs)]
    pub fn elapsed_secs(&self) -> u32 {
        self.read(|v| v.elapsed_secs).unwrap_or(0)
    }

    /// Fraction of the duration cap used, `0.0..=1.0`.
    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.read(CaptureView::progress).unwrap_or(0.0)
    }

    /// Message to show when the camera or microphone is unusable.
    #[wasm_bindgen(getter, js_name = deviceError)]
    pub fn device_error(&self) -> Option<String> {
        self.read(|v| match v.device {
            DeviceStatus::Failed(ref e) => Some(e.to_string()),
            _ => None,
        })
        .flatten()
    }
}
