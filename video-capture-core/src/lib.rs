//! # video-capture-core
//!
//! Platform-agnostic recording session controller for a video capture widget.
//!
//! Drives the camera/microphone stream, the encoder, the elapsed-time timer
//! and the preview of the finished recording, and hands the confirmed video
//! to the host. Platform backends (the browser, or fakes in tests) implement
//! the collaborator traits and plug into the generic `CaptureController`.
//!
//! ## Architecture
//!
//! ```text
//! video-capture-core (this crate)
//! ├── traits/       ← DeviceProvider, MediaEncoder, TickSource, PlaybackSurface, HandleStore, CaptureDelegate
//! ├── models/       ← CaptureError, DeviceStatus, RecordingState, Artifact, CaptureView, etc.
//! ├── processing/   ← ChunkBuffer, codec selection
//! ├── session/      ← DeviceSession, Recorder, PreviewController, CaptureController
//! └── storage/      ← artifact export, metadata sidecar
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types at crate root for convenience.
pub use models::artifact::{Artifact, ObjectHandle, VideoSource};
pub use models::config::CaptureConfiguration;
pub use models::error::{CaptureError, DeviceError};
pub use models::media::{EncodedChunk, MediaConstraints};
pub use models::state::{DeviceStatus, RecordingState};
pub use models::view::CaptureView;
pub use processing::chunk_buffer::ChunkBuffer;
pub use session::controller::{CaptureController, CaptureParts};
pub use session::events::CaptureEvent;
#[cfg(not(target_arch = "wasm32"))]
pub use session::ticker::{ThreadTicker, TickCallback};
pub use storage::export::{save_artifact, SavedArtifact};
pub use storage::metadata::ArtifactMetadata;
pub use traits::capture_backend::CaptureBackend;
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::device_provider::{AcquireToken, Acquisition, DeviceProvider, LiveStream};
pub use traits::handle_store::HandleStore;
pub use traits::media_encoder::MediaEncoder;
pub use traits::playback_surface::PlaybackSurface;
pub use traits::tick_source::{TickSource, TimerToken};
