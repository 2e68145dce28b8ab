use std::time::Duration;

use crate::config::AppConfig;

#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Starting volume, 0..=100.
    pub volume: u8,
    pub volume_step: u8,
    pub seek_step: Duration,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 80,
            volume_step: 5,
            seek_step: Duration::from_secs(5),
        }
    }
}

impl From<&AppConfig> for AudioConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            volume: config.volume.min(100),
            ..Self::default()
        }
    }
}
