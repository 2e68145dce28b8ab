use reqwest::Url;
use serde::Deserialize;

use super::{
    client::{ApiClient, Auth},
    error::{ApiError, ApiResult},
};
use crate::model::{ChartSummary, ListPayload, RawTrack, Source, Track, track::normalize_all};

const API_PATH: &str = "api/";

#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    results: Vec<RawTrack>,
}

/// Client for the `/api/?type=...` proxy.
#[derive(Clone)]
pub struct CatalogClient {
    api: ApiClient,
    search_limit: String,
    bitrate: String,
}

impl CatalogClient {
    pub fn new(api: ApiClient, search_limit: u32, bitrate: impl Into<String>) -> Self {
        Self {
            api,
            search_limit: search_limit.to_string(),
            bitrate: bitrate.into(),
        }
    }

    /// An empty keyword is rejected before any request is made.
    pub async fn search(&self, keyword: &str, source: Source) -> ApiResult<Vec<Track>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ApiError::Validation("Enter a keyword to search"));
        }

        let url = self.api.endpoint(
            API_PATH,
            &[
                ("type", "search"),
                ("keyword", keyword),
                ("source", source.as_str()),
                ("limit", &self.search_limit),
            ],
        )?;
        let (payload, _) = self.api.get::<SearchPayload>(url, Auth::Anonymous).await?;
        Ok(normalize_all(
            payload.map(|p| p.results).unwrap_or_default(),
            source,
        ))
    }

    pub async fn toplists(&self, source: Source) -> ApiResult<Vec<ChartSummary>> {
        let url = self
            .api
            .endpoint(API_PATH, &[("type", "toplists"), ("source", source.as_str())])?;
        let (payload, _) = self
            .api
            .get::<ListPayload<ChartSummary>>(url, Auth::Anonymous)
            .await?;
        Ok(payload.map(|p| p.list).unwrap_or_default())
    }

    pub async fn toplist(&self, chart_id: &str, source: Source) -> ApiResult<Vec<Track>> {
        let url = self.api.endpoint(
            API_PATH,
            &[
                ("type", "toplist"),
                ("source", source.as_str()),
                ("id", chart_id),
            ],
        )?;
        let (payload, _) = self
            .api
            .get::<ListPayload<RawTrack>>(url, Auth::Anonymous)
            .await?;
        Ok(normalize_all(
            payload.map(|p| p.list).unwrap_or_default(),
            source,
        ))
    }

    /// Raw LRC text for a track.
    pub async fn lyrics(&self, track: &Track) -> ApiResult<String> {
        let url = self.api.endpoint(
            API_PATH,
            &[
                ("type", "lrc"),
                ("source", track.source.as_str()),
                ("id", &track.id),
            ],
        )?;
        self.api.text(url).await
    }

    /// Redirecting URL of the playable stream.
    pub fn audio_url(&self, track: &Track) -> ApiResult<Url> {
        self.api.endpoint(
            API_PATH,
            &[
                ("source", track.source.as_str()),
                ("id", &track.id),
                ("type", "url"),
                ("br", &self.bitrate),
            ],
        )
    }

    /// Redirecting URL of the cover image.
    pub fn cover_url(&self, track: &Track) -> ApiResult<Url> {
        self.api.endpoint(
            API_PATH,
            &[
                ("source", track.source.as_str()),
                ("id", &track.id),
                ("type", "pic"),
            ],
        )
    }

    pub async fn fetch_audio(&self, track: &Track) -> ApiResult<Vec<u8>> {
        let url = self.audio_url(track)?;
        self.api.bytes(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, http::session::SessionHandle};

    fn catalog() -> CatalogClient {
        let config = AppConfig::for_base(Url::parse("http://localhost:8000").unwrap());
        let api = ApiClient::new(&config, SessionHandle::in_memory()).unwrap();
        CatalogClient::new(api, config.search_limit, config.bitrate)
    }

    fn track() -> Track {
        Track {
            id: "1868553".into(),
            name: "Song".into(),
            artist: "Band".into(),
            source: Source::Kuwo,
        }
    }

    #[test]
    fn media_urls_carry_source_id_and_bitrate() {
        let catalog = catalog();
        assert_eq!(
            catalog.audio_url(&track()).unwrap().as_str(),
            "http://localhost:8000/api/?source=kuwo&id=1868553&type=url&br=320k"
        );
        assert_eq!(
            catalog.cover_url(&track()).unwrap().as_str(),
            "http://localhost:8000/api/?source=kuwo&id=1868553&type=pic"
        );
    }

    #[tokio::test]
    async fn blank_keyword_is_rejected_locally() {
        let err = catalog().search("   ", Source::Qq).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
