use crate::models::error::CaptureError;

/// Creates and revokes in-memory playback references.
///
/// In a browser this is `URL.createObjectURL` / `URL.revokeObjectURL`.
pub trait HandleStore: Send + Sync {
    fn create(&self, data: &[u8], mime_type: &str) -> Result<String, CaptureError>;

    fn revoke(&self, url: &str);
}
