use std::{env, path::PathBuf, time::Duration};

use directories::ProjectDirs;
use reqwest::Url;
use thiserror::Error;

use crate::model::Source;

pub const ENV_API_BASE: &str = "TUNEHUB_API_BASE";
pub const ENV_SOURCE: &str = "TUNEHUB_SOURCE";
pub const ENV_BITRATE: &str = "TUNEHUB_BITRATE";
pub const ENV_SEARCH_LIMIT: &str = "TUNEHUB_SEARCH_LIMIT";
pub const ENV_TIMEOUT: &str = "TUNEHUB_TIMEOUT_SECS";
pub const ENV_SESSION_STORE: &str = "TUNEHUB_SESSION_STORE";
pub const ENV_DATA_DIR: &str = "TUNEHUB_DATA_DIR";
pub const ENV_VOLUME: &str = "TUNEHUB_VOLUME";
pub const ENV_LOG: &str = "TUNEHUB_LOG";

const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("could not determine a data directory; set {ENV_DATA_DIR}")]
    NoDataDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Keyring,
    File,
}

/// Everything the clients need, built once at startup and passed down.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: Url,
    pub default_source: Source,
    pub bitrate: String,
    pub search_limit: u32,
    pub request_timeout: Duration,
    pub session_backend: SessionBackend,
    pub data_dir: PathBuf,
    /// Starting volume, 0..=100.
    pub volume: u8,
}

impl AppConfig {
    /// Configuration pointing at `api_base` with every other field defaulted.
    /// `data_dir` is left empty; callers that persist anything must set it.
    pub fn for_base(api_base: Url) -> Self {
        Self {
            api_base,
            default_source: Source::Netease,
            bitrate: "320k".to_string(),
            search_limit: 50,
            request_timeout: Duration::from_secs(20),
            session_backend: SessionBackend::File,
            data_dir: PathBuf::new(),
            volume: 80,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base = lookup(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = Url::parse(raw_base.trim()).map_err(|e| ConfigError::Invalid {
            key: ENV_API_BASE,
            value: raw_base.clone(),
            reason: e.to_string(),
        })?;

        let default_source = match lookup(ENV_SOURCE) {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                key: ENV_SOURCE,
                value: raw,
                reason,
            })?,
            None => Source::Netease,
        };

        let search_limit = parse_number(&lookup, ENV_SEARCH_LIMIT, 50)?;
        let timeout_secs = parse_number(&lookup, ENV_TIMEOUT, 20)?;
        let volume = parse_number(&lookup, ENV_VOLUME, 80)?.min(100) as u8;

        let session_backend = match lookup(ENV_SESSION_STORE).as_deref().map(str::trim) {
            None | Some("keyring") => SessionBackend::Keyring,
            Some("file") => SessionBackend::File,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: ENV_SESSION_STORE,
                    value: other.to_string(),
                    reason: "expected `keyring` or `file`".to_string(),
                });
            }
        };

        let data_dir = match lookup(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => project_dirs()
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api_base,
            default_source,
            bitrate: lookup(ENV_BITRATE).unwrap_or_else(|| "320k".to_string()),
            search_limit,
            request_timeout: Duration::from_secs(timeout_secs as u64),
            session_backend,
            data_dir,
            volume,
        })
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("tunehub.log")
    }

    pub fn session_file(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "tunehub", "tunehub")
}

fn parse_number<F>(lookup: &F, key: &'static str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_DATA_DIR, "/tmp/tunehub")])).unwrap();
        assert_eq!(config.api_base.as_str(), "http://localhost:8000/");
        assert_eq!(config.default_source, Source::Netease);
        assert_eq!(config.bitrate, "320k");
        assert_eq!(config.search_limit, 50);
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.session_backend, SessionBackend::Keyring);
        assert_eq!(config.volume, 80);
        assert_eq!(config.session_file(), PathBuf::from("/tmp/tunehub/session.json"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_BASE, "https://music.example.org/base/"),
            (ENV_SOURCE, "QQ"),
            (ENV_SEARCH_LIMIT, "10"),
            (ENV_SESSION_STORE, "file"),
            (ENV_VOLUME, "250"),
            (ENV_DATA_DIR, "/tmp/x"),
        ]))
        .unwrap();
        assert_eq!(config.api_base.as_str(), "https://music.example.org/base/");
        assert_eq!(config.default_source, Source::Qq);
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.session_backend, SessionBackend::File);
        assert_eq!(config.volume, 100);
    }

    #[test]
    fn bad_values_are_reported_with_their_key() {
        let err = AppConfig::from_lookup(lookup(&[
            (ENV_SOURCE, "spotify"),
            (ENV_DATA_DIR, "/tmp/x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_SOURCE, .. }));

        let err = AppConfig::from_lookup(lookup(&[
            (ENV_SEARCH_LIMIT, "many"),
            (ENV_DATA_DIR, "/tmp/x"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_SEARCH_LIMIT, .. }));
    }
}
