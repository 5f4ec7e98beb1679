use std::time::Duration;

use crate::models::artifact::Artifact;
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::media::EncodedChunk;
use crate::models::state::RecordingState;
use crate::processing::chunk_buffer::ChunkBuffer;
use crate::processing::codec;
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::media_encoder::MediaEncoder;
use crate::traits::tick_source::{TickSource, TimerToken};

/// What a timer tick did.
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Stale token or not recording.
    Ignored,
    Elapsed(u32),
    /// The duration cap forced a stop. Carries the artifact when the encoder
    /// could not acknowledge the stop and the recording was finalized at once.
    CapReached(Option<Artifact>),
}

/// Recording state machine: drives the encoder and the elapsed-time timer,
/// accumulates chunks, and builds the artifact.
///
/// Only one timer token is live at a time; it is cancelled on every exit
/// from `Recording`, so a late tick can never stop the same recording twice.
pub struct Recorder<B: CaptureBackend> {
    encoder: B::Encoder,
    ticker: B::Ticker,
    state: RecordingState,
    chunks: ChunkBuffer,
    mime_type: String,
    timer: Option<TimerToken>,
    next_timer: u64,
    elapsed_ms: u64,
    max_duration_secs: u32,
    tick_interval: Duration,
    timeslice: Option<Duration>,
    mime_preferences: Vec<String>,
    fallback_mime_type: String,
}

impl<B: CaptureBackend> Recorder<B> {
    pub fn new(encoder: B::Encoder, ticker: B::Ticker, config: &CaptureConfiguration) -> Self {
        Self {
            encoder,
            ticker,
            state: RecordingState::Idle,
            chunks: ChunkBuffer::new(),
            mime_type: config.fallback_mime_type.clone(),
            timer: None,
            next_timer: 1,
            elapsed_ms: 0,
            max_duration_secs: config.max_duration_secs,
            tick_interval: config.tick_interval(),
            timeslice: config.timeslice(),
            mime_preferences: config.mime_preferences.clone(),
            fallback_mime_type: config.fallback_mime_type.clone(),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.state.elapsed_secs()
    }

    pub fn max_duration_secs(&self) -> u32 {
        self.max_duration_secs
    }

    /// Mime type of the current (or most recent) recording.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn buffered_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Start recording `stream`. Transitions: idle/stopped → recording.
    ///
    /// Resets the elapsed counter and the chunk buffer, then picks the first
    /// supported codec from the preference list.
    pub fn start(&mut self, stream: Option<&B::Stream>) -> Result<(), CaptureError> {
        match self.state {
            RecordingState::Recording { .. } => return Err(CaptureError::AlreadyRecording),
            RecordingState::Finalizing { .. } => return Err(CaptureError::StillFinalizing),
            RecordingState::Idle | RecordingState::Stopped => {}
        }

        let Some(stream) = stream else {
            log::warn!("cannot start recording: no live stream");
            return Err(CaptureError::StartWithoutStream);
        };

        self.chunks.clear();

        let selected = codec::select_mime_type(&self.mime_preferences, |mime| {
            self.encoder.is_type_supported(mime)
        });
        if selected.is_none() {
            log::debug!("no preferred codec supported, using encoder default");
        }

        self.encoder.start(stream, selected.as_deref(), self.timeslice)?;

        let token = TimerToken(self.next_timer);
        self.next_timer += 1;
        if let Err(e) = self.ticker.start(self.tick_interval, token) {
            if let Err(stop_err) = self.encoder.stop() {
                log::error!("failed to stop encoder after timer failure: {}", stop_err);
            }
            return Err(e);
        }

        self.mime_type = selected.unwrap_or_else(|| self.fallback_mime_type.clone());
        self.timer = Some(token);
        self.elapsed_ms = 0;
        self.state = RecordingState::Recording { elapsed_secs: 0 };
        log::info!("recording started ({})", self.mime_type);
        Ok(())
    }

    /// Append an encoded chunk. Order of arrival is preserved.
    pub fn on_chunk(&mut self, chunk: EncodedChunk) {
        match self.state {
            RecordingState::Recording { .. } | RecordingState::Finalizing { .. } => {
                let size = chunk.data.len();
                if !self.chunks.push(chunk.data) {
                    log::debug!("dropping empty chunk at {}ms", chunk.timestamp_ms);
                } else {
                    log::trace!("buffered chunk of {} bytes ({} total)", size, self.chunks.byte_len());
                }
            }
            RecordingState::Idle | RecordingState::Stopped => {
                log::debug!("dropping stray chunk of {} bytes while {:?}", chunk.data.len(), self.state);
            }
        }
    }

    /// Advance the elapsed time by one tick period, stopping at the duration cap.
    ///
    /// Seconds are whole seconds of tick time, so the cap holds for any period.
    pub fn on_tick(&mut self, token: TimerToken) -> Result<TickOutcome, CaptureError> {
        if self.timer != Some(token) {
            log::debug!("ignoring stale tick {:?}", token);
            return Ok(TickOutcome::Ignored);
        }
        if !self.state.is_recording() {
            return Ok(TickOutcome::Ignored);
        }

        let cap_ms = u64::from(self.max_duration_secs) * 1000;
        let period_ms = u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX);
        self.elapsed_ms = self.elapsed_ms.saturating_add(period_ms).min(cap_ms);
        let elapsed = (self.elapsed_ms / 1000) as u32;
        self.state = RecordingState::Recording { elapsed_secs: elapsed };

        if self.elapsed_ms >= cap_ms {
            log::info!("duration cap of {}s reached", self.max_duration_secs);
            let artifact = self.stop()?;
            return Ok(TickOutcome::CapReached(artifact));
        }
        Ok(TickOutcome::Elapsed(elapsed))
    }

    /// Stop recording. Transitions: recording → finalizing.
    ///
    /// The artifact is built when the encoder acknowledges the stop. If the
    /// encoder refuses to stop, it is built now from what was buffered.
    pub fn stop(&mut self) -> Result<Option<Artifact>, CaptureError> {
        let RecordingState::Recording { elapsed_secs } = self.state else {
            log::debug!("stop ignored while {:?}", self.state);
            return Err(CaptureError::StopWithoutActiveRecording);
        };

        self.cancel_timer();
        self.state = RecordingState::Finalizing {
            duration_secs: elapsed_secs,
        };

        match self.encoder.stop() {
            Ok(()) => Ok(None),
            Err(e) => {
                log::error!("encoder stop failed, finalizing buffered data: {}", e);
                Ok(Some(self.finalize()))
            }
        }
    }

    /// The encoder flushed its last chunk. Transitions: finalizing → stopped.
    pub fn on_encoder_stopped(&mut self) -> Option<Artifact> {
        if !self.state.is_finalizing() {
            log::debug!("ignoring encoder stop acknowledgment while {:?}", self.state);
            return None;
        }
        Some(self.finalize())
    }

    /// Return to idle once the artifact has been discarded.
    pub fn mark_idle(&mut self) {
        if self.state.is_stopped() {
            self.state = RecordingState::Idle;
        }
    }

    /// Tear down: cancel the timer, stop the encoder, drop buffered chunks.
    pub fn abort(&mut self) {
        self.cancel_timer();
        if matches!(
            self.state,
            RecordingState::Recording { .. } | RecordingState::Finalizing { .. }
        ) {
            if let Err(e) = self.encoder.stop() {
                log::error!("failed to stop encoder during teardown: {}", e);
            }
            log::info!("recording aborted");
        }
        self.chunks.clear();
        self.state = RecordingState::Idle;
    }

    fn finalize(&mut self) -> Artifact {
        let duration_secs = match self.state {
            RecordingState::Finalizing { duration_secs } => duration_secs,
            _ => 0,
        };
        let data = self.chunks.take();
        self.state = RecordingState::Stopped;
        log::info!(
            "recording stopped: {} bytes, {}s, {}",
            data.len(),
            duration_secs,
            self.mime_type
        );
        Artifact::new(data, self.mime_type.clone(), duration_secs)
    }

    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            self.ticker.cancel(token);
        }
    }
}

impl<B: CaptureBackend> Drop for Recorder<B> {
    fn drop(&mut self) {
        self.abort();
    }
}
