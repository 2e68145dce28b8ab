use reqwest::Method;

use super::{
    client::{ApiClient, Auth},
    error::{ApiError, ApiResult},
};
use crate::model::{Favorite, ListPayload, RawTrack, Source, Track, track::normalize_all};

#[derive(Clone)]
pub struct FavoritesClient {
    api: ApiClient,
}

impl FavoritesClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> ApiResult<Vec<Favorite>> {
        let url = self.api.endpoint("favorites", &[])?;
        let (payload, _) = self
            .api
            .get::<ListPayload<RawTrack>>(url, Auth::Bearer)
            .await?;
        Ok(normalize_all(
            payload.map(|p| p.list).unwrap_or_default(),
            Source::default(),
        ))
    }

    pub async fn add(&self, track: &Track) -> ApiResult<()> {
        let url = self.api.endpoint("favorites", &[])?;
        self.api
            .send::<_, serde_json::Value>(Method::POST, url, Some(track), Auth::Bearer)
            .await?;
        Ok(())
    }

    pub async fn remove(&self, track: &Track) -> ApiResult<()> {
        let url = self.api.endpoint(
            "favorites",
            &[("id", &track.id), ("source", track.source.as_str())],
        )?;
        self.api
            .send::<(), serde_json::Value>(Method::DELETE, url, None, Auth::Bearer)
            .await?;
        Ok(())
    }

    /// Removes the track when `present`, adds it otherwise, then returns the
    /// refetched server list.
    pub async fn toggle(&self, track: &Track, present: bool) -> ApiResult<Vec<Favorite>> {
        if !self.api.session().is_logged_in() {
            return Err(ApiError::NotLoggedIn);
        }
        if present {
            self.remove(track).await?;
        } else {
            self.add(track).await?;
        }
        self.list().await
    }
}

/// Local mirror of the server favorites. Only ever replaced wholesale by a
/// server response.
#[derive(Debug, Clone, Default)]
pub struct FavoritesStore {
    items: Vec<Favorite>,
}

impl FavoritesStore {
    pub fn new(items: Vec<Favorite>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Favorite] {
        &self.items
    }

    pub fn contains(&self, track: &Track) -> bool {
        self.items.iter().any(|f| f.same_as(track))
    }

    pub fn replace(&mut self, items: Vec<Favorite>) {
        self.items = items;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_keyed_by_id_and_source() {
        let mut store = FavoritesStore::default();
        let song = Track {
            id: "7".into(),
            name: "Seven".into(),
            artist: "Nobody".into(),
            source: Source::Netease,
        };
        store.replace(vec![song.clone()]);

        assert!(store.contains(&song));
        assert!(!store.contains(&Track {
            source: Source::Qq,
            ..song.clone()
        }));
        assert!(store.contains(&Track {
            name: "other title".into(),
            ..song
        }));
    }
}
