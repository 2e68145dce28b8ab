use async_trait::async_trait;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::{
    event::Event,
    model::Track,
    ui::{context::AppContext, state::AppState},
};

/// What a view asks the loop to do after handling a key.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    PlayPause,
    NextTrack,
    PreviousTrack,
    /// Replace the queue with `tracks` and start at `focus`.
    PlayList(Vec<Track>, Track),
    PlayIndex(usize),
    ToggleFavorite(Track),
    OpenLyrics,
    CloseLyrics,
    SwitchTab(usize),
    Back,
    /// The key was consumed; no global handling.
    None,
}

#[async_trait]
pub trait View: Send {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext);

    /// `None` lets the key fall through to the global key map.
    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action>;

    async fn on_event(&mut self, _event: &Event, _ctx: &AppContext) {}
}
