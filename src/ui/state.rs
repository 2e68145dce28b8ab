use crate::{
    http::FavoritesStore,
    lyrics::LyricsSync,
    model::{LoginLog, Profile, Source, Track},
    visualizer::Visualizer,
};

/// Lifecycle of one asynchronously loaded panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> PanelState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PanelState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PanelState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            PanelState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PanelState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn from_outcome(outcome: Result<T, String>) -> Self {
        match outcome {
            Ok(value) => PanelState::Ready(value),
            Err(reason) => PanelState::Failed(reason),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub data: AppData,
    pub ui: UiState,
}

/// Server-backed data shared by several views.
#[derive(Debug, Clone, Default)]
pub struct AppData {
    pub user: Option<String>,
    pub favorites: PanelState<FavoritesStore>,
    pub profile: PanelState<Profile>,
    pub logs: PanelState<Vec<LoginLog>>,
    pub lyrics: PanelState<LyricsSync>,
}

impl AppData {
    pub fn is_favorite(&self, track: &Track) -> bool {
        self.favorites
            .ready()
            .is_some_and(|favorites| favorites.contains(track))
    }

    /// Drops everything that belongs to the signed-in user.
    pub fn clear_account(&mut self) {
        self.user = None;
        self.favorites = PanelState::Idle;
        self.profile = PanelState::Idle;
        self.logs = PanelState::Idle;
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tab: Tab,
    pub source: Source,
    pub status: Option<Status>,
    pub visualizer: Visualizer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Search,
    Charts,
    Favorites,
    Queue,
    Account,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Search,
        Tab::Charts,
        Tab::Favorites,
        Tab::Queue,
        Tab::Account,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Search => "  Search",
            Tab::Charts => "  Charts",
            Tab::Favorites => "  Favorites",
            Tab::Queue => "  Queue",
            Tab::Account => "  Account",
        }
    }
}
