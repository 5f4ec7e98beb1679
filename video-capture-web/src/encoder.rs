use std::time::Duration;

use futures_channel::mpsc::{self, UnboundedSender};
use futures_util::StreamExt;
use js_sys::Uint8Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobEvent, Event, MediaRecorder, MediaRecorderOptions};

use video_capture_core::{CaptureError, CaptureEvent, EncodedChunk, MediaEncoder};

use crate::backend::WebEventSink;
use crate::device::WebStream;
use crate::js_error::describe;

enum RecorderSignal {
    Data { blob: Blob, timecode: f64 },
    Stopped,
}

struct ActiveRecorder {
    recorder: MediaRecorder,
    _on_data: Closure<dyn FnMut(BlobEvent)>,
    _on_stop: Closure<dyn FnMut(Event)>,
    stopping: bool,
}

/// Chunked encoding through `MediaRecorder`.
///
/// Blob reads are asynchronous, so every recorder callback goes through one
/// reader task that posts chunks and the stop acknowledgment in the order the
/// recorder produced them.
pub struct WebMediaEncoder {
    sink: WebEventSink,
    active: Option<ActiveRecorder>,
}

impl WebMediaEncoder {
    pub fn new(sink: WebEventSink) -> Self {
        Self { sink, active: None }
    }

    fn spawn_reader(&self) -> UnboundedSender<RecorderSignal> {
        let (tx, mut rx) = mpsc::unbounded();
        let sink = self.sink.clone();
        wasm_bindgen_futures::spawn_local(async move {
            while let Some(signal) = rx.next().await {
                match signal {
                    RecorderSignal::Data { blob, timecode } => match JsFuture::from(blob.array_buffer()).await {
                        Ok(buffer) => {
                            let data = Uint8Array::new(&buffer).to_vec();
                            sink.post(CaptureEvent::Chunk(EncodedChunk::new(data, timecode)));
                        }
                        Err(e) => log::error!("failed to read recorded chunk: {}", describe(&e)),
                    },
                    RecorderSignal::Stopped => {
                        sink.post(CaptureEvent::EncoderStopped);
                        break;
                    }
                }
            }
        });
        tx
    }
}

impl MediaEncoder<WebStream> for WebMediaEncoder {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        MediaRecorder::is_type_supported(mime_type)
    }

    fn start(
        &mut self,
        stream: &WebStream,
        mime_type: Option<&str>,
        timeslice: Option<Duration>,
    ) -> Result<(), CaptureError> {
        if let Some(previous) = self.active.take() {
            previous.detach();
        }

        let options = MediaRecorderOptions::new();
        if let Some(mime_type) = mime_type {
            options.set_mime_type(mime_type);
        }
        let recorder = MediaRecorder::new_with_media_stream_and_media_recorder_options(stream.media_stream(), &options)
            .map_err(|e| CaptureError::EncodingFailed(describe(&e)))?;

        let tx = self.spawn_reader();
        let data_tx = tx.clone();
        let on_data = Closure::<dyn FnMut(BlobEvent)>::new(move |event: BlobEvent| {
            if let Some(blob) = event.data() {
                let _ = data_tx.unbounded_send(RecorderSignal::Data {
                    blob,
                    timecode: event.timecode(),
                });
            }
        });
        let on_stop = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
            let _ = tx.unbounded_send(RecorderSignal::Stopped);
        });
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));

        let started = match timeslice {
            Some(slice) => recorder.start_with_time_slice(slice.as_millis().min(i32::MAX as u128) as i32),
            None => recorder.start(),
        };
        if let Err(e) = started {
            recorder.set_ondataavailable(None);
            recorder.set_onstop(None);
            return Err(CaptureError::EncodingFailed(describe(&e)));
        }

        log::debug!("MediaRecorder started ({})", recorder.mime_type());
        self.active = Some(ActiveRecorder {
            recorder,
            _on_data: on_data,
            _on_stop: on_stop,
            stopping: false,
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let Some(active) = self.active.as_mut() else {
            return Err(CaptureError::EncodingFailed("no active MediaRecorder".into()));
        };
        if active.stopping {
            return Ok(());
        }
        active.stopping = true;
        active
            .recorder
            .stop()
            .map_err(|e| CaptureError::EncodingFailed(describe(&e)))
    }
}

impl ActiveRecorder {
    /// Unhook the callbacks before their closures are dropped.
    fn detach(self) {
        self.recorder.set_ondataavailable(None);
        self.recorder.set_onstop(None);
        if !self.stopping {
            let _ = self.recorder.stop();
        }
    }
}

impl Drop for WebMediaEncoder {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.detach();
        }
    }
}
