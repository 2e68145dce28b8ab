use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

/// External catalog a track or query is scoped to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Netease,
    Kuwo,
    Qq,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Netease, Source::Kuwo, Source::Qq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Netease => "netease",
            Source::Kuwo => "kuwo",
            Source::Qq => "qq",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Source::Netease => "NetEase Cloud Music",
            Source::Kuwo => "Kuwo Music",
            Source::Qq => "QQ Music",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Source::Netease => Source::Kuwo,
            Source::Kuwo => Source::Qq,
            Source::Qq => Source::Netease,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "netease" => Ok(Source::Netease),
            "kuwo" => Ok(Source::Kuwo),
            "qq" => Ok(Source::Qq),
            other => Err(format!("unknown source `{other}`")),
        }
    }
}

/// A playable song. Two tracks are the same song when `(id, source)` match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub source: Source,
}

impl Track {
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id && self.source == other.source
    }

    pub fn display_artist(&self) -> &str {
        if self.artist.is_empty() {
            "Unknown artist"
        } else {
            &self.artist
        }
    }
}

/// Track as the catalog returns it: the source may live under `source` or
/// `platform`, and ids come as strings or numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl RawTrack {
    pub fn normalize(self, fallback: Source) -> Track {
        let source = self
            .source
            .as_deref()
            .or(self.platform.as_deref())
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback);

        Track {
            id: self.id,
            name: self.name.unwrap_or_default(),
            artist: self.artist.unwrap_or_default(),
            source,
        }
    }
}

pub fn normalize_all(raw: Vec<RawTrack>, fallback: Source) -> Vec<Track> {
    raw.into_iter().map(|t| t.normalize(fallback)).collect()
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}
