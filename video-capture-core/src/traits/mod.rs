pub mod capture_backend;
pub mod capture_delegate;
pub mod device_provider;
pub mod handle_store;
pub mod media_encoder;
pub mod playback_surface;
pub mod tick_source;
