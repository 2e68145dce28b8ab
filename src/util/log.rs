use std::fs::{self, File};

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{AppConfig, ENV_LOG};

/// Sends everything to `tunehub.log` in the data directory; the terminal
/// belongs to the UI.
pub fn initialize_logging(config: &AppConfig) -> color_eyre::Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    let log_file = File::create(config.log_file())?;

    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
