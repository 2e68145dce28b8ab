pub mod auth;
pub mod catalog;
pub mod client;
pub mod envelope;
pub mod error;
pub mod favorites;
pub mod session;

use std::sync::Arc;

use tracing::warn;

pub use auth::{AuthClient, PasswordForm, Restore};
pub use catalog::CatalogClient;
pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use favorites::{FavoritesClient, FavoritesStore};
pub use session::{Session, SessionHandle, SessionStore};

use crate::config::{AppConfig, SessionBackend};
use session::FileSessionStore;

/// Every backend client, sharing one connection pool and one session.
#[derive(Clone)]
pub struct ApiService {
    pub auth: AuthClient,
    pub catalog: CatalogClient,
    pub favorites: FavoritesClient,
    session: SessionHandle,
}

impl ApiService {
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        Self::with_session(config, SessionHandle::new(open_store(config)))
    }

    pub fn with_session(config: &AppConfig, session: SessionHandle) -> ApiResult<Self> {
        let api = ApiClient::new(config, session.clone())?;
        Ok(Self {
            auth: AuthClient::new(api.clone()),
            catalog: CatalogClient::new(api.clone(), config.search_limit, config.bitrate.clone()),
            favorites: FavoritesClient::new(api),
            session,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }
}

fn open_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    match config.session_backend {
        SessionBackend::File => Arc::new(FileSessionStore::new(config.session_file())),
        SessionBackend::Keyring => keyring_store(config),
    }
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
fn keyring_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    match session::KeyringSessionStore::new() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("Keyring unavailable, storing the session in a file: {e}");
            Arc::new(FileSessionStore::new(config.session_file()))
        }
    }
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn keyring_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    warn!("No keyring on this platform, storing the session in a file");
    Arc::new(FileSessionStore::new(config.session_file()))
}
