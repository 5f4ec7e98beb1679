use crate::models::error::{CaptureError, DeviceError};
use crate::models::media::MediaConstraints;
use crate::models::state::DeviceStatus;
use crate::traits::device_provider::{AcquireToken, Acquisition, DeviceProvider, LiveStream};

/// Owner of the live camera/microphone stream.
///
/// Holds at most one stream. A new acquisition releases the previous
/// stream's tracks before requesting another, and dropping the session
/// releases whatever it still holds.
pub struct DeviceSession<D: DeviceProvider> {
    provider: D,
    status: DeviceStatus,
    stream: Option<D::Stream>,
    pending: Option<AcquireToken>,
    next_token: u64,
}

impl<D: DeviceProvider> DeviceSession<D> {
    pub fn new(provider: D) -> Self {
        Self {
            provider,
            status: DeviceStatus::Inactive,
            stream: None,
            pending: None,
            next_token: 1,
        }
    }

    pub fn status(&self) -> &DeviceStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status.is_ready()
    }

    /// The live stream, only while `Ready`.
    pub fn stream(&self) -> Option<&D::Stream> {
        self.stream.as_ref()
    }

    /// Token of the request still waiting for an answer, if any.
    pub fn pending_token(&self) -> Option<AcquireToken> {
        self.pending
    }

    /// Request a stream. Transitions: inactive/failed/ready → acquiring → ready/failed.
    ///
    /// Completes immediately for synchronous providers; otherwise the host
    /// calls [`DeviceSession::complete`] with the pending token.
    pub fn acquire(&mut self, constraints: &MediaConstraints) -> Result<(), CaptureError> {
        if self.status.is_acquiring() {
            return Err(CaptureError::DeviceNotReady);
        }

        self.release();

        let token = AcquireToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(token);
        self.status = DeviceStatus::Acquiring;
        log::debug!("requesting media (video: {}, audio: {})", constraints.video, constraints.audio);

        match self.provider.request_media(constraints, token) {
            Acquisition::Ready(stream) => self.complete(token, Ok(stream)),
            Acquisition::Failed(err) => self.complete(token, Err(err)),
            Acquisition::Pending => Ok(()),
        }
    }

    /// Deliver the answer to an acquisition request.
    ///
    /// Answers for anything but the pending request are stale: a stale stream
    /// is stopped on the spot and the session is left untouched.
    pub fn complete(
        &mut self,
        token: AcquireToken,
        result: Result<D::Stream, DeviceError>,
    ) -> Result<(), CaptureError> {
        if self.pending != Some(token) {
            match result {
                Ok(mut stream) => {
                    log::warn!("releasing stream {} from superseded request {:?}", stream.id(), token);
                    stream.stop_tracks();
                }
                Err(err) => log::debug!("ignoring failure from superseded request {:?}: {}", token, err),
            }
            return Ok(());
        }

        self.pending = None;
        match result {
            Ok(stream) => {
                log::info!("device stream {} ready", stream.id());
                self.stream = Some(stream);
                self.status = DeviceStatus::Ready;
                Ok(())
            }
            Err(err) => {
                log::warn!("device acquisition failed: {}", err);
                self.status = DeviceStatus::Failed(err.clone());
                Err(CaptureError::Device(err))
            }
        }
    }

    /// Stop every track and forget any pending request. Idempotent.
    pub fn release(&mut self) {
        self.pending = None;
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
            log::info!("device stream {} released", stream.id());
        }
        self.status = DeviceStatus::Inactive;
    }
}

impl<D: DeviceProvider> Drop for DeviceSession<D> {
    fn drop(&mut self) {
        self.release();
    }
}
