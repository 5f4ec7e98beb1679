use js_sys::{Array, Uint8Array};
use web_sys::{Blob, BlobPropertyBag, Url};

use video_capture_core::{CaptureError, HandleStore};

use crate::js_error::describe;

/// Playback references as `blob:` object URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectUrlStore;

impl HandleStore for ObjectUrlStore {
    fn create(&self, data: &[u8], mime_type: &str) -> Result<String, CaptureError> {
        let parts = Array::of1(&Uint8Array::from(data));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| CaptureError::HandleFailed(describe(&e)))?;
        Url::create_object_url_with_blob(&blob).map_err(|e| CaptureError::HandleFailed(describe(&e)))
    }

    fn revoke(&self, url: &str) {
        if let Err(e) = Url::revoke_object_url(url) {
            log::warn!("failed to revoke {}: {}", url, describe(&e));
        }
    }
}
