use std::{
    fs, io,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("session file error: {0}")]
    Io(#[from] io::Error),

    #[error("session data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("keyring error: {0}")]
    Keyring(String),
}

/// Where the bearer token survives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StoreError>;
    fn save(&self, session: &Session) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        match fs::read(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
pub struct KeyringSessionStore {
    entry: keyring::Entry,
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
impl KeyringSessionStore {
    const SERVICE: &'static str = "tunehub";
    const ACCOUNT: &'static str = "session";

    /// Opens the entry and reads it once, so an unreachable secret service
    /// is reported here rather than on the first save.
    pub fn new() -> Result<Self, StoreError> {
        let entry = keyring::Entry::new(Self::SERVICE, Self::ACCOUNT)
            .map_err(|e| StoreError::Keyring(e.to_string()))?;
        reachable(entry.get_password())?;
        Ok(Self { entry })
    }
}

/// A stored secret, a missing one, or one that is not valid UTF-8 all prove
/// the backend answered.
#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
fn reachable(read: Result<String, keyring::Error>) -> Result<(), StoreError> {
    match read {
        Ok(_) | Err(keyring::Error::NoEntry) | Err(keyring::Error::BadEncoding(_)) => Ok(()),
        Err(e) => Err(StoreError::Keyring(e.to_string())),
    }
}

#[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        match self.entry.get_password() {
            Ok(secret) => Ok(Some(serde_json::from_str(&secret)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StoreError::Keyring(e.to_string())),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        self.entry
            .set_password(&serde_json::to_string(session)?)
            .map_err(|e| StoreError::Keyring(e.to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StoreError::Keyring(e.to_string())),
        }
    }
}

/// Keeps the session only for the lifetime of the process.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: RwLock<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.slot.read().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save(&self, session: &Session) -> Result<(), StoreError> {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Shared view of the current session, handed to every client that needs
/// the bearer token. Persistence failures are logged and never surface to
/// the caller: the in-memory session stays authoritative for this run.
#[derive(Clone)]
pub struct SessionHandle {
    current: Arc<RwLock<Option<Session>>>,
    store: Arc<dyn SessionStore>,
}

impl SessionHandle {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let restored = match store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to restore session: {e}");
                None
            }
        };
        if let Some(session) = &restored {
            debug!("Restored session for {}", session.username);
        }

        Self {
            current: Arc::new(RwLock::new(restored)),
            store,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    pub fn get(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.get().map(|s| s.token)
    }

    pub fn username(&self) -> Option<String> {
        self.get().map(|s| s.username)
    }

    pub fn is_logged_in(&self) -> bool {
        self.get().is_some()
    }

    pub fn establish(&self, session: Session) {
        if let Err(e) = self.store.save(&session) {
            warn!("Failed to persist session: {e}");
        }
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session);
    }

    pub fn rename(&self, username: &str) {
        let updated = {
            let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
            match guard.as_mut() {
                Some(session) if session.username != username => {
                    session.username = username.to_string();
                    Some(session.clone())
                }
                _ => None,
            }
        };
        if let Some(session) = updated
            && let Err(e) = self.store.save(&session)
        {
            warn!("Failed to persist session: {e}");
        }
    }

    pub fn destroy(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear stored session: {e}");
        }
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn keyring_is_usable_only_when_the_backend_answers() {
        assert!(reachable(Ok("{}".into())).is_ok());
        assert!(reachable(Err(keyring::Error::NoEntry)).is_ok());

        let locked = keyring::Error::NoStorageAccess(Box::new(io::Error::other("locked")));
        assert!(matches!(reachable(Err(locked)), Err(StoreError::Keyring(_))));

        let down = keyring::Error::PlatformFailure(Box::new(io::Error::other("no dbus")));
        let err = reachable(Err(down)).unwrap_err();
        assert!(err.to_string().starts_with("keyring error:"));
    }

    #[test]
    fn file_store_survives_a_restart() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");

        let handle = SessionHandle::new(Arc::new(FileSessionStore::new(path.clone())));
        assert!(!handle.is_logged_in());
        handle.establish(Session {
            token: "t0k3n".into(),
            username: "alice".into(),
        });

        let restored = SessionHandle::new(Arc::new(FileSessionStore::new(path.clone())));
        assert_eq!(restored.token().as_deref(), Some("t0k3n"));
        assert_eq!(restored.username().as_deref(), Some("alice"));

        restored.destroy();
        assert!(!path.exists());
        assert!(SessionHandle::new(Arc::new(FileSessionStore::new(path))).get().is_none());
    }

    #[test]
    fn corrupt_file_starts_logged_out() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();

        let handle = SessionHandle::new(Arc::new(FileSessionStore::new(path)));
        assert!(!handle.is_logged_in());
    }

    #[test]
    fn rename_keeps_the_token() {
        let handle = SessionHandle::in_memory();
        handle.establish(Session {
            token: "abc".into(),
            username: "old".into(),
        });
        handle.rename("new");
        assert_eq!(handle.username().as_deref(), Some("new"));
        assert_eq!(handle.token().as_deref(), Some("abc"));
    }
}
