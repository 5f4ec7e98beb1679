use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::metadata::{write_metadata, ArtifactMetadata};
use crate::models::artifact::Artifact;
use crate::models::error::CaptureError;
use crate::processing::codec;

/// A video written to disk together with its sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub file_path: PathBuf,
    pub metadata: ArtifactMetadata,
}

/// Write `artifact` to `output_directory` as `video_<uuid>.<ext>`.
///
/// The extension follows the artifact's container. A `.metadata.json`
/// sidecar with a SHA-256 checksum of the bytes is written next to it.
pub fn save_artifact(artifact: &Artifact, output_directory: &Path) -> Result<SavedArtifact, CaptureError> {
    if artifact.is_empty() {
        return Err(CaptureError::EmptyArtifact);
    }

    fs::create_dir_all(output_directory)
        .map_err(|e| CaptureError::StorageError(format!("failed to create output directory: {}", e)))?;

    let extension = codec::file_extension(artifact.mime_type());
    let file_name = format!("video_{}.{}", uuid::Uuid::new_v4(), extension);
    let file_path = output_directory.join(file_name);

    fs::write(&file_path, artifact.data())
        .map_err(|e| CaptureError::StorageError(format!("failed to write video: {}", e)))?;

    let checksum = sha256_hex(artifact.data());
    let metadata = ArtifactMetadata::for_artifact(artifact, &file_path.to_string_lossy(), &checksum);
    write_metadata(&metadata, &file_path)?;

    log::info!("saved {} ({} bytes)", file_path.display(), artifact.len());
    Ok(SavedArtifact { file_path, metadata })
}

fn sha256_hex(data: &[u8]) -> String {
    Sha256::digest(data).iter().map(|b| format!("{:02x}", b)).collect()
}
