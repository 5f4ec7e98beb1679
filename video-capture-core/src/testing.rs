//! Fake collaborators for unit tests.
//!
//! Each fake shares a probe (`Arc<Mutex<..>>`) with the test so calls can be
//! inspected after the fake has been moved into a controller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::artifact::VideoSource;
use crate::models::config::CaptureConfiguration;
use crate::models::error::{CaptureError, DeviceError};
use crate::models::media::MediaConstraints;
use crate::models::view::CaptureView;
use crate::session::controller::{CaptureController, CaptureParts};
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::capture_delegate::CaptureDelegate;
use crate::traits::device_provider::{AcquireToken, Acquisition, DeviceProvider, LiveStream};
use crate::traits::handle_store::HandleStore;
use crate::traits::media_encoder::MediaEncoder;
use crate::traits::playback_surface::PlaybackSurface;
use crate::traits::tick_source::{TickSource, TimerToken};

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// -- Device --

#[derive(Debug)]
pub(crate) struct FakeStream {
    id: u64,
    live: Arc<Mutex<bool>>,
}

impl LiveStream for FakeStream {
    fn id(&self) -> String {
        format!("fake-stream-{}", self.id)
    }

    fn stop_tracks(&mut self) {
        *self.live.lock() = false;
    }

    fn is_live(&self) -> bool {
        *self.live.lock()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeviceMode {
    Ready,
    Denied,
    Unavailable,
    Pending,
}

#[derive(Default)]
pub(crate) struct DeviceLog {
    pub requests: Vec<AcquireToken>,
    pub streams: Vec<Arc<Mutex<bool>>>,
}

#[derive(Clone, Default)]
pub(crate) struct DeviceProbe(Arc<Mutex<DeviceLog>>);

impl DeviceProbe {
    /// Mint a new live stream, as a backend would on a successful request.
    pub fn issue_stream(&self) -> FakeStream {
        let mut log = self.0.lock();
        let live = Arc::new(Mutex::new(true));
        log.streams.push(Arc::clone(&live));
        FakeStream {
            id: log.streams.len() as u64,
            live,
        }
    }

    pub fn requests(&self) -> Vec<AcquireToken> {
        self.0.lock().requests.clone()
    }

    pub fn last_request(&self) -> AcquireToken {
        *self.0.lock().requests.last().expect("no device request made")
    }

    pub fn issued(&self) -> usize {
        self.0.lock().streams.len()
    }

    pub fn live_streams(&self) -> usize {
        self.0.lock().streams.iter().filter(|s| *s.lock()).count()
    }
}

pub(crate) struct FakeDevice {
    mode: DeviceMode,
    probe: DeviceProbe,
}

impl FakeDevice {
    pub fn new(mode: DeviceMode) -> (Self, DeviceProbe) {
        let probe = DeviceProbe::default();
        (
            Self {
                mode,
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl DeviceProvider for FakeDevice {
    type Stream = FakeStream;

    fn request_media(&mut self, _constraints: &MediaConstraints, token: AcquireToken) -> Acquisition<FakeStream> {
        self.probe.0.lock().requests.push(token);
        match self.mode {
            DeviceMode::Ready => Acquisition::Ready(self.probe.issue_stream()),
            DeviceMode::Denied => Acquisition::Failed(DeviceError::PermissionDenied),
            DeviceMode::Unavailable => Acquisition::Failed(DeviceError::Unavailable("no camera".into())),
            DeviceMode::Pending => Acquisition::Pending,
        }
    }
}

// -- Encoder --

#[derive(Default)]
pub(crate) struct EncoderLog {
    pub starts: Vec<Option<String>>,
    pub timeslices: Vec<Option<Duration>>,
    pub stops: usize,
    pub running: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
}

#[derive(Clone, Default)]
pub(crate) struct EncoderProbe(Arc<Mutex<EncoderLog>>);

impl EncoderProbe {
    pub fn starts(&self) -> Vec<Option<String>> {
        self.0.lock().starts.clone()
    }

    pub fn stops(&self) -> usize {
        self.0.lock().stops
    }

    pub fn is_running(&self) -> bool {
        self.0.lock().running
    }

    pub fn last_timeslice(&self) -> Option<Duration> {
        self.0.lock().timeslices.last().copied().flatten()
    }

    pub fn fail_start(&self, fail: bool) {
        self.0.lock().fail_start = fail;
    }

    pub fn fail_stop(&self, fail: bool) {
        self.0.lock().fail_stop = fail;
    }
}

pub(crate) struct FakeEncoder {
    supported: Vec<String>,
    probe: EncoderProbe,
}

impl FakeEncoder {
    pub fn new(supported: &[&str]) -> (Self, EncoderProbe) {
        let probe = EncoderProbe::default();
        (
            Self {
                supported: supported.iter().map(|s| s.to_string()).collect(),
                probe: probe.clone(),
            },
            probe,
        )
    }
}

impl MediaEncoder<FakeStream> for FakeEncoder {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.supported.iter().any(|s| s == mime_type)
    }

    fn start(
        &mut self,
        stream: &FakeStream,
        mime_type: Option<&str>,
        timeslice: Option<Duration>,
    ) -> Result<(), CaptureError> {
        let mut log = self.probe.0.lock();
        if log.fail_start {
            return Err(CaptureError::EncodingFailed("start rejected".into()));
        }
        assert!(stream.is_live(), "encoder started on a dead stream");
        log.starts.push(mime_type.map(str::to_string));
        log.timeslices.push(timeslice);
        log.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let mut log = self.probe.0.lock();
        log.stops += 1;
        log.running = false;
        if log.fail_stop {
            return Err(CaptureError::EncodingFailed("stop rejected".into()));
        }
        Ok(())
    }
}

// -- Ticker --

#[derive(Default)]
pub(crate) struct TickerLog {
    pub started: Vec<TimerToken>,
    pub cancelled: Vec<TimerToken>,
    pub active: Option<TimerToken>,
    pub period: Option<Duration>,
}

#[derive(Clone, Default)]
pub(crate) struct TickerProbe(Arc<Mutex<TickerLog>>);

impl TickerProbe {
    pub fn active(&self) -> Option<TimerToken> {
        self.0.lock().active
    }

    pub fn started(&self) -> Vec<TimerToken> {
        self.0.lock().started.clone()
    }

    pub fn cancelled(&self) -> Vec<TimerToken> {
        self.0.lock().cancelled.clone()
    }

    pub fn period(&self) -> Option<Duration> {
        self.0.lock().period
    }
}

pub(crate) struct FakeTicker {
    probe: TickerProbe,
}

impl FakeTicker {
    pub fn new() -> (Self, TickerProbe) {
        let probe = TickerProbe::default();
        (Self { probe: probe.clone() }, probe)
    }
}

impl TickSource for FakeTicker {
    fn start(&mut self, period: Duration, token: TimerToken) -> Result<(), CaptureError> {
        let mut log = self.probe.0.lock();
        assert!(log.active.is_none(), "timer started while another is running");
        log.started.push(token);
        log.active = Some(token);
        log.period = Some(period);
        Ok(())
    }

    fn cancel(&mut self, token: TimerToken) {
        let mut log = self.probe.0.lock();
        log.cancelled.push(token);
        if log.active == Some(token) {
            log.active = None;
        }
    }
}

// -- Surface --

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SurfaceContent {
    Nothing,
    Stream(String),
    Source(String),
}

pub(crate) struct SurfaceLog {
    pub content: SurfaceContent,
    pub muted: bool,
    pub running: bool,
    pub plays: usize,
    pub fail_play: bool,
}

impl Default for SurfaceLog {
    fn default() -> Self {
        Self {
            content: SurfaceContent::Nothing,
            muted: true,
            running: false,
            plays: 0,
            fail_play: false,
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct SurfaceProbe(Arc<Mutex<SurfaceLog>>);

impl SurfaceProbe {
    pub fn content(&self) -> SurfaceContent {
        self.0.lock().content.clone()
    }

    pub fn muted(&self) -> bool {
        self.0.lock().muted
    }

    pub fn plays(&self) -> usize {
        self.0.lock().plays
    }

    /// Whether the element is currently playing whatever it shows.
    pub fn running(&self) -> bool {
        self.0.lock().running
    }

    pub fn fail_play(&self, fail: bool) {
        self.0.lock().fail_play = fail;
    }
}

pub(crate) struct FakeSurface {
    probe: SurfaceProbe,
}

impl FakeSurface {
    pub fn new() -> (Self, SurfaceProbe) {
        let probe = SurfaceProbe::default();
        (Self { probe: probe.clone() }, probe)
    }
}

impl PlaybackSurface<FakeStream> for FakeSurface {
    fn show_stream(&mut self, stream: &FakeStream) {
        let mut log = self.probe.0.lock();
        log.content = SurfaceContent::Stream(stream.id());
        log.running = true;
    }

    fn show_source(&mut self, url: &str) {
        let mut log = self.probe.0.lock();
        log.content = SurfaceContent::Source(url.to_string());
        log.running = false;
    }

    fn clear(&mut self) {
        let mut log = self.probe.0.lock();
        log.content = SurfaceContent::Nothing;
        log.running = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.probe.0.lock().muted = muted;
    }

    fn play(&mut self) -> Result<(), CaptureError> {
        let mut log = self.probe.0.lock();
        if log.fail_play {
            return Err(CaptureError::PlaybackUnavailable);
        }
        log.plays += 1;
        log.running = true;
        Ok(())
    }
}

// -- Handles --

#[derive(Default)]
struct HandleLog {
    next: u64,
    live: Vec<String>,
    revoked: Vec<String>,
    max_live: usize,
    fail_create: bool,
}

/// Object-URL store that tracks how many handles are live at once.
#[derive(Default)]
pub(crate) struct FakeHandleStore {
    log: Mutex<HandleLog>,
}

impl FakeHandleStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn live_count(&self) -> usize {
        self.log.lock().live.len()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.log.lock().live.iter().any(|u| u == url)
    }

    pub fn revoked(&self) -> Vec<String> {
        self.log.lock().revoked.clone()
    }

    pub fn fail_create(&self, fail: bool) {
        self.log.lock().fail_create = fail;
    }

    /// Highest number of simultaneously live handles ever observed.
    pub fn max_live(&self) -> usize {
        self.log.lock().max_live
    }
}

impl HandleStore for FakeHandleStore {
    fn create(&self, _data: &[u8], _mime_type: &str) -> Result<String, CaptureError> {
        let mut log = self.log.lock();
        if log.fail_create {
            return Err(CaptureError::HandleFailed("object URL rejected".into()));
        }
        log.next += 1;
        let url = format!("blob:test/{}", log.next);
        log.live.push(url.clone());
        log.max_live = log.max_live.max(log.live.len());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        let mut log = self.log.lock();
        assert!(
            log.live.iter().any(|u| u == url),
            "revoking unknown or already revoked handle {}",
            url
        );
        log.live.retain(|u| u != url);
        log.revoked.push(url.to_string());
    }
}

// -- Delegate --

#[derive(Default)]
pub(crate) struct RecordingDelegate {
    pub views: Mutex<Vec<CaptureView>>,
    pub errors: Mutex<Vec<CaptureError>>,
    pub closed: Mutex<usize>,
}

impl RecordingDelegate {
    pub fn last_view(&self) -> Option<CaptureView> {
        self.views.lock().last().cloned()
    }

    pub fn errors(&self) -> Vec<CaptureError> {
        self.errors.lock().clone()
    }

    pub fn closed(&self) -> usize {
        *self.closed.lock()
    }
}

impl CaptureDelegate for RecordingDelegate {
    fn on_view_changed(&self, view: &CaptureView) {
        self.views.lock().push(view.clone());
    }

    fn on_error(&self, error: &CaptureError) {
        self.errors.lock().push(error.clone());
    }

    fn on_closed(&self) {
        *self.closed.lock() += 1;
    }
}

// -- Backend + harness --

pub(crate) struct TestBackend;

impl CaptureBackend for TestBackend {
    type Stream = FakeStream;
    type Device = FakeDevice;
    type Encoder = FakeEncoder;
    type Ticker = FakeTicker;
    type Surface = FakeSurface;
}

pub(crate) const SUPPORTED: [&str; 2] = ["video/webm;codecs=vp8,opus", "video/webm"];

/// A controller wired to fakes, with every probe exposed.
pub(crate) struct Harness {
    pub controller: CaptureController<TestBackend>,
    pub device: DeviceProbe,
    pub encoder: EncoderProbe,
    pub ticker: TickerProbe,
    pub surface: SurfaceProbe,
    pub handles: Arc<FakeHandleStore>,
    pub delegate: Arc<RecordingDelegate>,
    pub confirmed: Arc<Mutex<Vec<VideoSource>>>,
}

impl Harness {
    pub fn new(mode: DeviceMode) -> Self {
        Self::with_config(mode, CaptureConfiguration::default())
    }

    pub fn with_config(mode: DeviceMode, config: CaptureConfiguration) -> Self {
        init_logging();
        let (device_fake, device) = FakeDevice::new(mode);
        let (encoder_fake, encoder) = FakeEncoder::new(&SUPPORTED);
        let (ticker_fake, ticker) = FakeTicker::new();
        let (surface_fake, surface) = FakeSurface::new();
        let handles = FakeHandleStore::new();
        let delegate = Arc::new(RecordingDelegate::default());
        let confirmed = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&confirmed);
        let parts = CaptureParts {
            device: device_fake,
            encoder: encoder_fake,
            ticker: ticker_fake,
            surface: surface_fake,
            handles: handles.clone(),
        };
        let mut controller = CaptureController::new(config, parts, move |source| sink.lock().push(source))
            .expect("valid test configuration");
        controller.set_delegate(delegate.clone());

        Self {
            controller,
            device,
            encoder,
            ticker,
            surface,
            handles,
            delegate,
            confirmed,
        }
    }

    /// Open the widget with a synchronously ready device.
    pub fn opened() -> Self {
        let mut h = Self::new(DeviceMode::Ready);
        h.controller.open_capture().expect("device ready");
        h
    }

    /// Tick the live timer `n` times.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            let token = self.ticker.active().expect("no live timer");
            self.controller.on_tick(token).expect("tick");
        }
    }

    /// Record `chunks`, stop, and deliver the encoder's stop acknowledgment.
    pub fn record(&mut self, chunks: &[&[u8]]) {
        self.controller.toggle_recording().expect("start");
        for chunk in chunks {
            self.controller
                .on_chunk(crate::models::media::EncodedChunk::new(chunk.to_vec(), 0.0))
                .expect("chunk");
        }
        self.controller.toggle_recording().expect("stop");
        self.controller.on_encoder_stopped().expect("finalize");
    }

    pub fn confirmed(&self) -> Vec<VideoSource> {
        self.confirmed.lock().clone()
    }
}
