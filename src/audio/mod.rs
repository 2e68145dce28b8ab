pub mod analyzer;
pub mod config;
pub mod controller;
pub mod error;
pub mod playback;
pub mod progress;
pub mod queue;
pub mod state;
pub mod system;
pub mod traits;
