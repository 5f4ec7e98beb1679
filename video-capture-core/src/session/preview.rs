use std::sync::Arc;

use crate::models::artifact::{Artifact, ObjectHandle, VideoSource};
use crate::models::error::CaptureError;
use crate::traits::capture_backend::CaptureBackend;
use crate::traits::handle_store::HandleStore;
use crate::traits::playback_surface::PlaybackSurface;

struct HeldArtifact {
    artifact: Artifact,
    /// `None` when the handle could not be created; retried on play and confirm.
    handle: Option<ObjectHandle>,
}

/// Owns the finished artifact and its playback handle, and decides what the
/// surface shows.
///
/// At most one handle is live: the held one is revoked before a replacement
/// is created, on discard, on supersession and on clear. A recording whose
/// handle cannot be created is still held, so it is never silently lost.
pub struct PreviewController<B: CaptureBackend> {
    surface: B::Surface,
    handles: Arc<dyn HandleStore>,
    held: Option<HeldArtifact>,
    is_playing: bool,
}

impl<B: CaptureBackend> PreviewController<B> {
    pub fn new(surface: B::Surface, handles: Arc<dyn HandleStore>) -> Self {
        Self {
            surface,
            handles,
            held: None,
            is_playing: false,
        }
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.held.as_ref().map(|h| &h.artifact)
    }

    pub fn handle_url(&self) -> Option<&str> {
        self.held.as_ref().and_then(|h| h.handle.as_ref()).map(|h| h.url())
    }

    pub fn has_artifact(&self) -> bool {
        self.held.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether confirming would hand something to the host.
    pub fn can_confirm(&self) -> bool {
        self.artifact().is_some_and(|a| !a.is_empty())
    }

    /// Point the surface at the live device feed, muted.
    pub fn show_live(&mut self, stream: &B::Stream) {
        self.surface.show_stream(stream);
        self.surface.set_muted(true);
    }

    /// Take ownership of a freshly produced artifact and show it.
    pub fn on_artifact_produced(&mut self, artifact: Artifact) -> Result<(), CaptureError> {
        self.revoke_held();
        self.held = Some(HeldArtifact { artifact, handle: None });

        if let Err(e) = self.ensure_handle() {
            // the revoked source must not stay on screen
            self.surface.clear();
            return Err(e);
        }
        Ok(())
    }

    /// Start playback of the held artifact.
    pub fn play(&mut self, recording: bool) -> Result<(), CaptureError> {
        if recording {
            return Err(CaptureError::PlaybackUnavailable);
        }
        if self.held.is_none() {
            return Err(CaptureError::NoArtifact);
        }
        if self.is_playing {
            return Ok(());
        }
        self.ensure_handle()?;
        self.surface.play()?;
        self.is_playing = true;
        Ok(())
    }

    /// The surface reported that playback paused or ended.
    pub fn on_playback_stopped(&mut self) {
        self.is_playing = false;
    }

    /// Release the held artifact's handle to the host.
    ///
    /// The returned source is the host's; it is not revoked on close.
    pub fn confirm(&mut self) -> Result<VideoSource, CaptureError> {
        match &self.held {
            None => return Err(CaptureError::NoArtifact),
            Some(held) if held.artifact.is_empty() => {
                log::debug!("confirm ignored: recorded video is empty");
                return Err(CaptureError::EmptyArtifactConfirm);
            }
            Some(_) => {}
        }
        self.ensure_handle()?;
        let Some(HeldArtifact {
            artifact,
            handle: Some(handle),
        }) = self.held.take()
        else {
            return Err(CaptureError::NoArtifact);
        };

        self.is_playing = false;
        self.surface.clear();

        let url = handle.release_to_host();
        log::info!("video confirmed: {} ({} bytes)", url, artifact.len());
        Ok(VideoSource {
            url,
            mime_type: artifact.mime_type().to_string(),
            size_bytes: artifact.len(),
            duration_secs: artifact.duration_secs(),
        })
    }

    /// Drop the held artifact and go back to the live feed, if there is one.
    pub fn discard(&mut self, live: Option<&B::Stream>) -> Result<(), CaptureError> {
        if self.held.is_none() {
            return Err(CaptureError::NoArtifact);
        }
        self.revoke_held();
        log::info!("recorded video discarded");
        self.show_live_or_clear(live);
        Ok(())
    }

    /// A new recording started: the held artifact is superseded.
    pub fn supersede(&mut self, live: &B::Stream) {
        if self.held.is_some() {
            log::info!("previous recording superseded");
        }
        self.revoke_held();
        self.show_live(live);
    }

    /// Revoke everything and detach the surface.
    pub fn clear(&mut self) {
        self.revoke_held();
        self.surface.clear();
    }

    fn show_live_or_clear(&mut self, live: Option<&B::Stream>) {
        match live {
            Some(stream) => self.show_live(stream),
            None => self.surface.clear(),
        }
    }

    /// Give the held artifact a playback handle and show it, if it has none.
    fn ensure_handle(&mut self) -> Result<(), CaptureError> {
        let Some(held) = self.held.as_mut() else {
            return Err(CaptureError::NoArtifact);
        };
        if held.handle.is_some() {
            return Ok(());
        }

        let handle = ObjectHandle::create(&self.handles, &held.artifact)?;
        self.surface.show_source(handle.url());
        self.surface.set_muted(false);
        log::info!("previewing {} ({} bytes)", handle.url(), held.artifact.len());
        held.handle = Some(handle);
        Ok(())
    }

    fn revoke_held(&mut self) {
        if let Some(mut handle) = self.held.take().and_then(|held| held.handle) {
            handle.revoke();
        }
        self.is_playing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        init_logging, DeviceProbe, FakeHandleStore, FakeStream, FakeSurface, SurfaceContent, SurfaceProbe,
        TestBackend,
    };
    use crate::traits::device_provider::LiveStream;

    struct Rig {
        preview: PreviewController<TestBackend>,
        surface: SurfaceProbe,
        handles: Arc<FakeHandleStore>,
        stream: FakeStream,
    }

    fn rig() -> Rig {
        init_logging();
        let (surface_fake, surface) = FakeSurface::new();
        let handles = FakeHandleStore::new();
        let stream = DeviceProbe::default().issue_stream();
        Rig {
            preview: PreviewController::new(surface_fake, handles.clone()),
            surface,
            handles,
            stream,
        }
    }

    fn artifact(data: &[u8]) -> Artifact {
        Artifact::new(data.to_vec(), "video/webm", 3)
    }

    #[test]
    fn produced_artifact_is_shown_unmuted() {
        let mut rig = rig();
        rig.preview.show_live(&rig.stream);
        assert!(rig.surface.muted());

        rig.preview.on_artifact_produced(artifact(b"video")).unwrap();

        let url = rig.preview.handle_url().unwrap().to_string();
        assert_eq!(rig.surface.content(), SurfaceContent::Source(url));
        assert!(!rig.surface.muted());
        assert!(!rig.preview.is_playing());
        assert!(rig.preview.can_confirm());
    }

    #[test]
    fn replacement_revokes_prior_handle_first() {
        let mut rig = rig();
        rig.preview.on_artifact_produced(artifact(b"one")).unwrap();
        let first = rig.preview.handle_url().unwrap().to_string();
        rig.preview.on_artifact_produced(artifact(b"two")).unwrap();

        assert_eq!(rig.handles.revoked(), vec![first]);
        assert_eq!(rig.handles.live_count(), 1);
        assert_eq!(rig.handles.max_live(), 1);
    }

    #[test]
    fn play_tracks_is_playing() {
        let mut rig = rig();
        assert_eq!(rig.preview.play(false), Err(CaptureError::NoArtifact));

        rig.preview.on_artifact_produced(artifact(b"v")).unwrap();
        assert_eq!(rig.preview.play(true), Err(CaptureError::PlaybackUnavailable));

        rig.preview.play(false).unwrap();
        assert!(rig.preview.is_playing());
        rig.preview.play(false).unwrap();
        assert_eq!(rig.surface.plays(), 1);

        rig.preview.on_playback_stopped();
        assert!(!rig.preview.is_playing());
    }

    #[test]
    fn failed_play_stays_paused() {
        let mut rig = rig();
        rig.preview.on_artifact_produced(artifact(b"v")).unwrap();
        rig.surface.fail_play(true);

        assert!(rig.preview.play(false).is_err());
        assert!(!rig.preview.is_playing());
    }

    #[test]
    fn confirm_hands_over_without_revoking() {
        let mut rig = rig();
        rig.preview.on_artifact_produced(artifact(b"video")).unwrap();
        let url = rig.preview.handle_url().unwrap().to_string();

        let source = rig.preview.confirm().unwrap();

        assert_eq!(source.url, url);
        assert_eq!(source.size_bytes, 5);
        assert_eq!(source.duration_secs, 3);
        assert!(rig.handles.is_live(&url));
        assert!(!rig.preview.has_artifact());

        rig.preview.clear();
        assert!(rig.handles.is_live(&url));
    }

    #[test]
    fn confirm_empty_artifact_is_guarded() {
        let mut rig = rig();
        rig.preview.on_artifact_produced(artifact(b"")).unwrap();

        assert!(!rig.preview.can_confirm());
        assert_eq!(rig.preview.confirm(), Err(CaptureError::EmptyArtifactConfirm));
        assert!(rig.preview.has_artifact());
    }

    #[test]
    fn discard_returns_to_live_feed() {
        let mut rig = rig();
        assert_eq!(rig.preview.discard(Some(&rig.stream)), Err(CaptureError::NoArtifact));

        rig.preview.on_artifact_produced(artifact(b"v")).unwrap();
        rig.preview.discard(Some(&rig.stream)).unwrap();

        assert_eq!(rig.handles.live_count(), 0);
        assert_eq!(rig.surface.content(), SurfaceContent::Stream(rig.stream.id()));
        assert!(rig.surface.muted());
    }

    #[test]
    fn discard_without_device_clears_surface() {
        let mut rig = rig();
        rig.preview.on_artifact_produced(artifact(b"v")).unwrap();
        rig.preview.discard(None).unwrap();

        assert_eq!(rig.surface.content(), SurfaceContent::Nothing);
    }

    #[test]
    fn failed_handle_keeps_recording_until_retry() {
        let mut rig = rig();
        rig.preview.on_artifact_produced(artifact(b"one")).unwrap();
        rig.handles.fail_create(true);

        let err = rig.preview.on_artifact_produced(artifact(b"two")).unwrap_err();

        assert!(matches!(err, CaptureError::HandleFailed(_)));
        assert_eq!(rig.handles.live_count(), 0);
        assert_eq!(rig.surface.content(), SurfaceContent::Nothing);
        assert_eq!(rig.preview.artifact().unwrap().data(), b"two");
        assert_eq!(rig.preview.handle_url(), None);
        assert!(rig.preview.play(false).is_err());
        assert!(!rig.preview.is_playing());

        rig.handles.fail_create(false);
        rig.preview.play(false).unwrap();

        let url = rig.preview.handle_url().unwrap().to_string();
        assert_eq!(rig.surface.content(), SurfaceContent::Source(url));
        assert!(rig.preview.is_playing());
        assert_eq!(rig.handles.max_live(), 1);
    }

    #[test]
    fn confirm_creates_missing_handle() {
        let mut rig = rig();
        rig.handles.fail_create(true);
        assert!(rig.preview.on_artifact_produced(artifact(b"video")).is_err());

        assert!(matches!(rig.preview.confirm(), Err(CaptureError::HandleFailed(_))));
        assert!(rig.preview.has_artifact());

        rig.handles.fail_create(false);
        let source = rig.preview.confirm().unwrap();
        assert!(rig.handles.is_live(&source.url));
        assert!(!rig.preview.has_artifact());
    }

    #[test]
    fn drop_revokes_held_handle() {
        let rig = rig();
        let Rig { mut preview, handles, .. } = rig;
        preview.on_artifact_produced(artifact(b"v")).unwrap();
        drop(preview);

        assert_eq!(handles.live_count(), 0);
    }
}
