use std::sync::Arc;

use flume::Sender;

use crate::{audio::system::AudioSystem, config::AppConfig, event::Event, http::ApiService};

/// Long-lived services the views read from and send commands through.
pub struct AppContext {
    pub config: AppConfig,
    pub api: Arc<ApiService>,
    pub audio_system: AudioSystem,
    pub event_tx: Sender<Event>,
}
