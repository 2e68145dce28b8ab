use async_trait::async_trait;

use crate::{audio::error::AudioError, http::CatalogClient, model::Track};

/// Where the controller gets encoded audio from.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn fetch_audio(&self, track: &Track) -> Result<Vec<u8>, AudioError>;
}

#[async_trait]
impl AudioSource for CatalogClient {
    async fn fetch_audio(&self, track: &Track) -> Result<Vec<u8>, AudioError> {
        CatalogClient::fetch_audio(self, track)
            .await
            .map_err(|e| AudioError::Download(e.user_message("Could not load the track")))
    }
}
