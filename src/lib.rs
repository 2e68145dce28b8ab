pub mod audio;
pub mod config;
pub mod event;
pub mod http;
pub mod lyrics;
pub mod model;
pub mod ui;
pub mod util;
pub mod visualizer;
