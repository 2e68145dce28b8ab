use std::time::Duration;

use crate::{
    http::{PasswordForm, Restore},
    model::{ChartSummary, Favorite, LoginLog, Profile, Source, Track},
};

/// Result of a background request, already turned into a user message on
/// failure.
pub type Outcome<T> = Result<T, String>;

/// Everything that reaches the event loop from outside a key press.
///
/// Results of panel requests carry the request id handed out by the
/// [`TaskManager`](crate::util::task::TaskManager); the loop drops those
/// that are no longer the latest for their panel.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum Event {
    // Playback
    TrackStarted(Track, Duration),
    TrackEnded,
    PlaybackFailed(Track, String),

    // Results
    SessionRestored(Restore),
    AuthFinished {
        id: u64,
        result: Outcome<String>,
    },
    SearchLoaded {
        id: u64,
        source: Source,
        result: Outcome<Vec<Track>>,
    },
    ChartsLoaded {
        id: u64,
        source: Source,
        result: Outcome<Vec<ChartSummary>>,
    },
    ChartTracksLoaded {
        id: u64,
        chart: ChartSummary,
        result: Outcome<Vec<Track>>,
    },
    LyricsLoaded {
        id: u64,
        track: Track,
        result: Outcome<String>,
    },
    FavoritesLoaded {
        id: u64,
        result: Outcome<Vec<Favorite>>,
    },
    FavoriteToggled {
        id: u64,
        result: Outcome<Vec<Favorite>>,
    },
    ProfileLoaded {
        id: u64,
        result: Outcome<Profile>,
    },
    LogsLoaded {
        id: u64,
        result: Outcome<Vec<LoginLog>>,
    },
    AccountUpdated {
        id: u64,
        result: Outcome<String>,
    },
    AccountDeleted {
        id: u64,
        result: Outcome<String>,
    },
    LoggedOut,

    // Commands
    Search(String),
    LoadCharts,
    OpenChart(ChartSummary),
    CycleSource,
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
    },
    Logout,
    RefreshAccount,
    SaveProfile(Profile),
    ChangePassword(PasswordForm),
    DeleteAccount(String),
    ToggleFavorite(Track),
    Status(String),
}

/// Task keys of the panels whose results are tagged with a request id.
pub mod keys {
    pub const AUTH: &str = "auth";
    pub const SEARCH: &str = "search";
    pub const CHARTS: &str = "charts";
    pub const CHART_TRACKS: &str = "chart_tracks";
    pub const LYRICS: &str = "lyrics";
    pub const FAVORITES: &str = "favorites";
    /// Separate from [`FAVORITES`] so a refetch never cancels a pending toggle.
    pub const FAVORITE_TOGGLE: &str = "favorite_toggle";
    pub const PROFILE: &str = "profile";
    pub const LOGS: &str = "logs";
    pub const ACCOUNT: &str = "account";
}

impl Event {
    /// Task key and request id of a tagged result.
    pub fn request(&self) -> Option<(&'static str, u64)> {
        let tagged = match self {
            Event::AuthFinished { id, .. } => (keys::AUTH, *id),
            Event::SearchLoaded { id, .. } => (keys::SEARCH, *id),
            Event::ChartsLoaded { id, .. } => (keys::CHARTS, *id),
            Event::ChartTracksLoaded { id, .. } => (keys::CHART_TRACKS, *id),
            Event::LyricsLoaded { id, .. } => (keys::LYRICS, *id),
            Event::FavoritesLoaded { id, .. } => (keys::FAVORITES, *id),
            Event::FavoriteToggled { id, .. } => (keys::FAVORITE_TOGGLE, *id),
            Event::ProfileLoaded { id, .. } => (keys::PROFILE, *id),
            Event::LogsLoaded { id, .. } => (keys::LOGS, *id),
            Event::AccountUpdated { id, .. } | Event::AccountDeleted { id, .. } => {
                (keys::ACCOUNT, *id)
            }
            _ => return None,
        };
        Some(tagged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_carry_their_panel_key() {
        let event = Event::SearchLoaded {
            id: 7,
            source: Source::Qq,
            result: Ok(Vec::new()),
        };
        assert_eq!(event.request(), Some((keys::SEARCH, 7)));
        assert_eq!(Event::TrackEnded.request(), None);
        assert_eq!(Event::Search("x".into()).request(), None);
    }

    #[test]
    fn toggle_results_are_not_matched_against_refetches() {
        let toggled = Event::FavoriteToggled {
            id: 3,
            result: Ok(Vec::new()),
        };
        let loaded = Event::FavoritesLoaded {
            id: 4,
            result: Ok(Vec::new()),
        };
        assert_eq!(toggled.request(), Some((keys::FAVORITE_TOGGLE, 3)));
        assert_eq!(loaded.request(), Some((keys::FAVORITES, 4)));
    }
}
