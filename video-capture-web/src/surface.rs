use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, HtmlVideoElement};

use video_capture_core::{CaptureError, CaptureEvent, PlaybackSurface};

use crate::backend::WebEventSink;
use crate::device::WebStream;
use crate::js_error::describe;

/// The `<video>` element the widget renders into.
///
/// Live feeds are attached as `srcObject` and autoplay. Recordings are
/// attached as `src` with autoplay off, so only `play()` starts them. Pause
/// and end of playback are posted back as events.
pub struct VideoElementSurface {
    element: HtmlVideoElement,
    sink: WebEventSink,
    on_pause: Closure<dyn FnMut(Event)>,
    on_ended: Closure<dyn FnMut(Event)>,
}

impl VideoElementSurface {
    pub fn new(element: HtmlVideoElement, sink: WebEventSink) -> Result<Self, CaptureError> {
        let pause_sink = sink.clone();
        let on_pause = Closure::<dyn FnMut(Event)>::new(move |_: Event| pause_sink.post(CaptureEvent::PlaybackPaused));
        let ended_sink = sink.clone();
        let on_ended = Closure::<dyn FnMut(Event)>::new(move |_: Event| ended_sink.post(CaptureEvent::PlaybackEnded));

        element
            .add_event_listener_with_callback("pause", on_pause.as_ref().unchecked_ref())
            .map_err(|e| CaptureError::ConfigurationFailed(describe(&e)))?;
        element
            .add_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref())
            .map_err(|e| CaptureError::ConfigurationFailed(describe(&e)))?;
        element.set_autoplay(false);

        Ok(Self {
            element,
            sink,
            on_pause,
            on_ended,
        })
    }

    fn detach_source(&self) {
        self.element.set_src_object(None);
        let _ = self.element.remove_attribute("src");
    }
}

impl PlaybackSurface<WebStream> for VideoElementSurface {
    fn show_stream(&mut self, stream: &WebStream) {
        let _ = self.element.remove_attribute("src");
        self.element.set_autoplay(true);
        self.element.set_src_object(Some(stream.media_stream()));
    }

    fn show_source(&mut self, url: &str) {
        self.element.set_autoplay(false);
        self.element.set_src_object(None);
        self.element.set_src(url);
    }

    fn clear(&mut self) {
        let _ = self.element.pause();
        self.detach_source();
        self.element.load();
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }

    fn play(&mut self) -> Result<(), CaptureError> {
        let promise = self.element.play().map_err(|_| CaptureError::PlaybackUnavailable)?;
        let sink = self.sink.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("playback rejected: {}", describe(&e));
                sink.post(CaptureEvent::PlaybackPaused);
            }
        });
        Ok(())
    }
}

impl Drop for VideoElementSurface {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback("pause", self.on_pause.as_ref().unchecked_ref());
        let _ = self
            .element
            .remove_event_listener_with_callback("ended", self.on_ended.as_ref().unchecked_ref());
        self.detach_source();
    }
}
