use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use video_capture_core::{CaptureError, CaptureEvent, TickSource, TimerToken};

use crate::backend::WebEventSink;
use crate::js_error::describe;

struct Interval {
    token: TimerToken,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// Elapsed-time timer over `setInterval`.
pub struct IntervalTicker {
    sink: WebEventSink,
    interval: Option<Interval>,
}

impl IntervalTicker {
    pub fn new(sink: WebEventSink) -> Self {
        Self { sink, interval: None }
    }

    fn clear(&mut self) {
        if let Some(interval) = self.interval.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(interval.handle);
            }
        }
    }
}

impl TickSource for IntervalTicker {
    fn start(&mut self, period: Duration, token: TimerToken) -> Result<(), CaptureError> {
        self.clear();
        let window = web_sys::window().ok_or_else(|| CaptureError::TimerFailed("no window".into()))?;

        let sink = self.sink.clone();
        let callback = Closure::<dyn FnMut()>::new(move || sink.post(CaptureEvent::Tick(token)));
        let millis = period.as_millis().min(i32::MAX as u128) as i32;
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), millis)
            .map_err(|e| CaptureError::TimerFailed(describe(&e)))?;

        self.interval = Some(Interval {
            token,
            handle,
            _callback: callback,
        });
        Ok(())
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.interval.as_ref().is_some_and(|i| i.token == token) {
            self.clear();
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.clear();
    }
}
