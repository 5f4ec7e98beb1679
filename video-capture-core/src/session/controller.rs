use std::path::Path;
use std::sync::Arc;

use crate::models::artifact::{Artifact, VideoSource};
use crate::models::config::CaptureConfiguration;
use crate::models::error::{CaptureError, DeviceError};
use crate::models::media::EncodedChunk;
use crate::models::state::{DeviceStatus, RecordingState};
use crate::models::view::CaptureView;
use crate::session::device::DeviceSession;
use crate::session::events::CaptureEvent;
use crate::session::preview::PreviewController;
use crate::session::recorder::{Recorder, TickOutcome};
use crate::storage::export::{self, SavedArtifact};
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::device_provider::AcquireToken;
use crate::traits::handle_store::HandleStore;
use crate::traits::tick_source::TimerToken;

/// Platform collaborators handed to a new controller.
pub struct CaptureParts<B: CaptureBackend> {
    pub device: B::Device,
    pub encoder: B::Encoder,
    pub ticker: B::Ticker,
    pub surface: B::Surface,
    pub handles: Arc<dyn HandleStore>,
}

/// Setter-style callback receiving the confirmed video.
pub type VideoSourceSetter = Box<dyn FnMut(VideoSource)>;

/// Recording session controller behind the capture widget.
///
/// Owns the device session, the recording state machine and the preview,
/// and applies intents and platform callbacks one at a time:
/// ```text
/// [Shell intents] ─┐
/// [Device/Encoder] ├→ CaptureController ─→ Recorder ─→ Artifact ─→ PreviewController ─→ host
/// [Timer/Surface] ─┘         │
///                            └→ DeviceSession (live feed)
/// ```
///
/// Guarded no-ops are logged and returned but change nothing. Device
/// failures are also reported to the delegate as blocking notices. Every
/// resource is released on close, on confirm, and when the controller is
/// dropped.
pub struct CaptureController<B: CaptureBackend> {
    config: CaptureConfiguration,
    device: DeviceSession<B::Device>,
    recorder: Recorder<B>,
    preview: PreviewController<B>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    on_video: VideoSourceSetter,
    open: bool,
}

impl<B: CaptureBackend> CaptureController<B> {
    pub fn new<F>(config: CaptureConfiguration, parts: CaptureParts<B>, on_video: F) -> Result<Self, CaptureError>
    where
        F: FnMut(VideoSource) + 'static,
    {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;

        let CaptureParts {
            device,
            encoder,
            ticker,
            surface,
            handles,
        } = parts;

        Ok(Self {
            recorder: Recorder::new(encoder, ticker, &config),
            device: DeviceSession::new(device),
            preview: PreviewController::new(surface, handles),
            delegate: None,
            on_video: Box::new(on_video),
            open: false,
            config,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn CaptureDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &CaptureConfiguration {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn device_status(&self) -> &DeviceStatus {
        self.device.status()
    }

    /// Token to answer with when the device provider replied `Pending`.
    pub fn pending_device_token(&self) -> Option<AcquireToken> {
        self.device.pending_token()
    }

    pub fn recording_state(&self) -> RecordingState {
        self.recorder.state()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.recorder.elapsed_secs()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.preview.artifact()
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.handle_url()
    }

    pub fn is_playing(&self) -> bool {
        self.preview.is_playing()
    }

    /// Snapshot of what the presentation shell should render.
    pub fn view(&self) -> CaptureView {
        let state = self.recorder.state();
        CaptureView {
            open: self.open,
            device: self.device.status().clone(),
            recording: state.is_recording(),
            finalizing: state.is_finalizing(),
            elapsed_secs: state.elapsed_secs(),
            max_duration_secs: self.recorder.max_duration_secs(),
            has_artifact: self.preview.has_artifact(),
            is_playing: self.preview.is_playing(),
            can_confirm: self.preview.can_confirm(),
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: CaptureEvent<B::Stream>) -> Result<(), CaptureError> {
        match event {
            CaptureEvent::OpenCapture => self.open_capture(),
            CaptureEvent::CloseCapture => self.close_capture(),
            CaptureEvent::ToggleRecording => self.toggle_recording(),
            CaptureEvent::PlayPreview => self.play_preview(),
            CaptureEvent::ConfirmVideo => self.confirm_video(),
            CaptureEvent::DiscardVideo => self.discard_video(),
            CaptureEvent::DeviceAcquired { token, result } => self.on_device_acquired(token, result),
            CaptureEvent::Chunk(chunk) => self.on_chunk(chunk),
            CaptureEvent::EncoderStopped => self.on_encoder_stopped(),
            CaptureEvent::Tick(token) => self.on_tick(token),
            CaptureEvent::PlaybackPaused | CaptureEvent::PlaybackEnded => self.on_playback_stopped(),
        }
    }

    // --- Intents ---

    /// Mount the widget and request the camera and microphone.
    pub fn open_capture(&mut self) -> Result<(), CaptureError> {
        if self.open {
            return Ok(());
        }
        self.open = true;
        log::info!("capture opened");

        let result = self.device.acquire(&self.config.constraints);
        self.show_live_feed();
        self.settle(result)
    }

    /// Dismiss the widget, releasing the stream, the held video and the timer.
    pub fn close_capture(&mut self) -> Result<(), CaptureError> {
        self.teardown();
        let was_open = std::mem::replace(&mut self.open, false);
        if was_open {
            log::info!("capture closed");
            if let Some(ref delegate) = self.delegate {
                delegate.on_closed();
            }
        }
        self.notify();
        Ok(())
    }

    /// Start recording when idle, stop when recording.
    pub fn toggle_recording(&mut self) -> Result<(), CaptureError> {
        if self.recorder.state().is_recording() {
            self.stop_recording()
        } else {
            self.start_recording()
        }
    }

    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        let result = self.try_start();
        self.settle(result)
    }

    pub fn stop_recording(&mut self) -> Result<(), CaptureError> {
        let result = match self.recorder.stop() {
            Ok(Some(artifact)) => self.preview.on_artifact_produced(artifact),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        self.settle(result)
    }

    pub fn play_preview(&mut self) -> Result<(), CaptureError> {
        let recording = self.recorder.state().is_recording();
        let result = self.preview.play(recording);
        self.settle(result)
    }

    /// Hand the recorded video to the host and close the widget.
    pub fn confirm_video(&mut self) -> Result<(), CaptureError> {
        let source = match self.preview.confirm() {
            Ok(source) => source,
            Err(e) => return self.settle(Err(e)),
        };
        (self.on_video)(source);
        self.close_capture()
    }

    /// Throw the recorded video away and return to the live feed.
    pub fn discard_video(&mut self) -> Result<(), CaptureError> {
        let result = self.preview.discard(self.device.stream());
        if result.is_ok() {
            self.recorder.mark_idle();
        }
        self.settle(result)
    }

    /// Write the held video and its metadata sidecar into `output_directory`.
    pub fn save_artifact(&self, output_directory: &Path) -> Result<SavedArtifact, CaptureError> {
        let artifact = self.preview.artifact().ok_or(CaptureError::NoArtifact)?;
        export::save_artifact(artifact, output_directory)
    }

    // --- Platform callbacks ---

    pub fn on_device_acquired(
        &mut self,
        token: AcquireToken,
        result: Result<B::Stream, DeviceError>,
    ) -> Result<(), CaptureError> {
        let result = self.device.complete(token, result);
        self.show_live_feed();
        self.settle(result)
    }

    pub fn on_chunk(&mut self, chunk: EncodedChunk) -> Result<(), CaptureError> {
        self.recorder.on_chunk(chunk);
        Ok(())
    }

    pub fn on_encoder_stopped(&mut self) -> Result<(), CaptureError> {
        let Some(artifact) = self.recorder.on_encoder_stopped() else {
            return Ok(());
        };
        let result = self.preview.on_artifact_produced(artifact);
        self.settle(result)
    }

    pub fn on_tick(&mut self, token: TimerToken) -> Result<(), CaptureError> {
        let result = match self.recorder.on_tick(token) {
            Ok(TickOutcome::Ignored) => return Ok(()),
            Ok(TickOutcome::Elapsed(_)) | Ok(TickOutcome::CapReached(None)) => Ok(()),
            Ok(TickOutcome::CapReached(Some(artifact))) => self.preview.on_artifact_produced(artifact),
            Err(e) => Err(e),
        };
        self.settle(result)
    }

    /// The surface reported pause or end of playback.
    pub fn on_playback_stopped(&mut self) -> Result<(), CaptureError> {
        self.preview.on_playback_stopped();
        self.notify();
        Ok(())
    }

    // --- Internal helpers ---

    fn try_start(&mut self) -> Result<(), CaptureError> {
        if self.device.status().is_acquiring() {
            return Err(CaptureError::DeviceNotReady);
        }
        self.recorder.start(self.device.stream())?;
        if let Some(stream) = self.device.stream() {
            self.preview.supersede(stream);
        }
        Ok(())
    }

    /// Show the device feed unless a finished recording is on screen.
    fn show_live_feed(&mut self) {
        if self.preview.has_artifact() {
            return;
        }
        if let Some(stream) = self.device.stream() {
            self.preview.show_live(stream);
        }
    }

    fn teardown(&mut self) {
        self.recorder.abort();
        self.preview.clear();
        self.device.release();
    }

    /// Log or report `result`, push a fresh view, and pass `result` through.
    fn settle(&self, result: Result<(), CaptureError>) -> Result<(), CaptureError> {
        if let Err(ref e) = result {
            if e.is_guard() {
                log::debug!("intent ignored: {}", e);
            } else if e.is_blocking() {
                log::warn!("capture unavailable: {}", e);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(e);
                }
            } else {
                log::error!("capture error: {}", e);
            }
        }
        self.notify();
        result
    }

    fn notify(&self) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_view_changed(&self.view());
        }
    }
}

impl<B: CaptureBackend> Drop for CaptureController<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
