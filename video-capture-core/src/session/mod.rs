pub mod controller;
pub mod device;
pub mod events;
pub mod preview;
pub mod recorder;
#[cfg(not(target_arch = "wasm32"))]
pub mod ticker;
