use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::models::error::CaptureError;
use crate::traits::handle_store::HandleStore;

/// The finished, encoded video produced by one recording.
///
/// `data` is the concatenation of every chunk in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    data: Vec<u8>,
    mime_type: String,
    duration_secs: u32,
}

impl Artifact {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            duration_secs,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Whole seconds recorded before the stop.
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Revocable playback reference to an [`Artifact`] (an object URL in a browser).
///
/// Revoked exactly once: explicitly, or on drop. A handle passed to the host
/// with [`ObjectHandle::release_to_host`] is no longer ours to revoke.
pub struct ObjectHandle {
    url: String,
    store: Arc<dyn HandleStore>,
    live: bool,
}

impl ObjectHandle {
    pub fn create(store: &Arc<dyn HandleStore>, artifact: &Artifact) -> Result<Self, CaptureError> {
        let url = store.create(artifact.data(), artifact.mime_type())?;
        log::debug!("created playback handle {} ({} bytes)", url, artifact.len());
        Ok(Self {
            url,
            store: Arc::clone(store),
            live: true,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn revoke(&mut self) {
        if self.live {
            self.store.revoke(&self.url);
            self.live = false;
            log::debug!("revoked playback handle {}", self.url);
        }
    }

    /// Hand ownership of the reference to the host without revoking it.
    pub fn release_to_host(mut self) -> String {
        self.live = false;
        std::mem::take(&mut self.url)
    }
}

impl Drop for ObjectHandle {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("url", &self.url)
            .field("live", &self.live)
            .finish()
    }
}

/// The confirmed video handed to the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSource {
    /// Playable reference, now owned by the host.
    pub url: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub duration_secs: u32,
}
