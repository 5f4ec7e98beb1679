//! # video-capture-web
//!
//! Browser backend for video-capture-core.
//!
//! Provides:
//! - `WebDeviceProvider`: camera and microphone via `getUserMedia`
//! - `WebMediaEncoder`: chunked encoding via `MediaRecorder`
//! - `IntervalTicker`: elapsed-time ticks via `setInterval`
//! - `VideoElementSurface`: live feed and preview on a `<video>` element
//! - `ObjectUrlStore`: `blob:` object URLs for recordings
//! - `CaptureWidget` / `VideoCapture`: mounted controller, from Rust or JavaScript
//!
//! `EventSink` serializes intents and browser callbacks into the controller
//! and builds on every target.
//!
//! ## Usage
//! ```ignore
//! use video_capture_core::CaptureConfiguration;
//! use video_capture_web::CaptureWidget;
//!
//! let widget = CaptureWidget::mount(video_element, CaptureConfiguration::default(), |source| {
//!     log::info!("got {}", source.url);
//! })?;
//! widget.post(video_capture_core::CaptureEvent::OpenCapture);
//! ```

pub mod dispatch;

#[cfg(target_arch = "wasm32")]
pub mod backend;
#[cfg(target_arch = "wasm32")]
pub mod device;
#[cfg(target_arch = "wasm32")]
pub mod encoder;
#[cfg(target_arch = "wasm32")]
pub mod handles;
#[cfg(target_arch = "wasm32")]
mod js_error;
#[cfg(target_arch = "wasm32")]
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod ticker;
#[cfg(target_arch = "wasm32")]
pub mod widget;

pub use dispatch::{EventSink, SharedController};

#[cfg(target_arch = "wasm32")]
pub use backend::{WebBackend, WebEventSink};
#[cfg(target_arch = "wasm32")]
pub use device::{WebDeviceProvider, WebStream};
#[cfg(target_arch = "wasm32")]
pub use encoder::WebMediaEncoder;
#[cfg(target_arch = "wasm32")]
pub use handles::ObjectUrlStore;
#[cfg(target_arch = "wasm32")]
pub use surface::VideoElementSurface;
#[cfg(target_arch = "wasm32")]
pub use ticker::IntervalTicker;
#[cfg(target_arch = "wasm32")]
pub use widget::{CaptureWidget, VideoCapture};
