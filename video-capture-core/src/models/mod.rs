pub mod artifact;
pub mod config;
pub mod error;
pub mod media;
pub mod state;
pub mod view;
