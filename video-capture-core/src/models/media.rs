use serde::{Deserialize, Serialize};

/// Codec/container combinations tried in order when a recording starts.
pub const DEFAULT_MIME_PREFERENCES: [&str; 7] = [
    "video/webm;codecs=vp9,opus",
    "video/webm;codecs=vp8,opus",
    "video/webm;codecs=h264,opus",
    "video/webm;codecs=vp9",
    "video/webm;codecs=vp8",
    "video/webm",
    "video/mp4",
];

/// Container assumed for the artifact when no preference is supported.
pub const FALLBACK_MIME_TYPE: &str = "video/webm";

/// Which inputs to request from the capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            video: true,
            audio: true,
        }
    }
}

/// A fragment of encoded media delivered by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedChunk {
    pub data: Vec<u8>,
    /// Encoder timestamp in milliseconds.
    pub timestamp_ms: f64,
}

impl EncodedChunk {
    pub fn new(data: Vec<u8>, timestamp_ms: f64) -> Self {
        Self { data, timestamp_ms }
    }
}
