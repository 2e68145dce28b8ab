use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders},
};

use crate::ui::{
    components::{lyrics::LyricsWidget, spectrum::SpectrumSurface},
    context::AppContext,
    state::AppState,
    traits::{Action, View},
};

/// Full-size lyrics with a second spectrum under them.
#[derive(Default)]
pub struct Lyrics;

#[async_trait]
impl View for Lyrics {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let title = ctx
            .audio_system
            .current_track()
            .map_or("Lyrics".to_string(), |t| format!("{} - {}", t.name, t.display_artist()));
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .title(title)
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Percentage(35)])
            .split(inner);

        f.render_widget(LyricsWidget::new(&state.data.lyrics), chunks[0]);
        state
            .ui
            .visualizer
            .paint(&mut SpectrumSurface::new(chunks[1], f.buffer_mut()));
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        _ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('y') => Some(Action::CloseLyrics),
            _ => None,
        }
    }
}
