use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::artifact::Artifact;
use crate::models::error::CaptureError;

/// Metadata stored alongside an exported video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub id: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub duration_secs: u32,
    pub checksum: String,
    pub created_at: String,
}

impl ArtifactMetadata {
    pub fn for_artifact(artifact: &Artifact, file_path: &str, checksum: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_path: file_path.to_string(),
            mime_type: artifact.mime_type().to_string(),
            size_bytes: artifact.len() as u64,
            duration_secs: artifact.duration_secs(),
            checksum: checksum.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Sidecar location for a saved video: `video_<id>.webm` → `video_<id>.metadata.json`.
pub fn sidecar_path(video_path: &Path) -> PathBuf {
    video_path.with_extension("metadata.json")
}

/// Store `metadata` next to the video it describes, as pretty-printed JSON.
pub fn write_metadata(metadata: &ArtifactMetadata, video_path: &Path) -> Result<(), CaptureError> {
    let json = serde_json::to_vec_pretty(metadata)
        .map_err(|e| CaptureError::StorageError(format!("cannot encode video metadata: {}", e)))?;
    let path = sidecar_path(video_path);
    fs::write(&path, json)
        .map_err(|e| CaptureError::StorageError(format!("cannot write {}: {}", path.display(), e)))
}

/// Load the metadata saved next to `video_path`.
pub fn read_metadata(video_path: &Path) -> Result<ArtifactMetadata, CaptureError> {
    let path = sidecar_path(video_path);
    let file = fs::File::open(&path)
        .map_err(|e| CaptureError::StorageError(format!("cannot open {}: {}", path.display(), e)))?;
    serde_json::from_reader(io::BufReader::new(file))
        .map_err(|e| CaptureError::StorageError(format!("malformed metadata in {}: {}", path.display(), e)))
}
