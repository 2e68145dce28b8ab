use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{ListState, Paragraph},
};

use crate::{
    event::Event,
    model::Favorite,
    ui::{
        components::{
            spinner::Spinner,
            track_list::{NowPlaying, step, track_list},
        },
        context::AppContext,
        state::{AppState, PanelState},
        traits::{Action, View},
    },
    util::{colors, page::paginate},
};

pub const PAGE_SIZE: usize = 5;

#[derive(Default)]
pub struct Favorites {
    list_state: ListState,
    page: usize,
}

impl Favorites {
    fn items(state: &AppState) -> &[Favorite] {
        state
            .data
            .favorites
            .ready()
            .map_or(&[][..], |favorites| favorites.items())
    }
}

#[async_trait]
impl View for Favorites {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        if state.data.user.is_none() {
            f.render_widget(
                Paragraph::new("Sign in on the Account tab to see your favorites")
                    .style(Style::default().fg(colors::NEUTRAL)),
                chunks[0],
            );
            return;
        }

        match &state.data.favorites {
            PanelState::Idle | PanelState::Loading => {
                f.render_widget(
                    Spinner::default()
                        .with_style(Style::default().fg(colors::PRIMARY))
                        .with_label("Loading favorites..."),
                    chunks[0],
                );
            }
            PanelState::Failed(reason) => {
                f.render_widget(
                    Paragraph::new(reason.as_str()).style(Style::default().fg(colors::ERROR)),
                    chunks[0],
                );
            }
            PanelState::Ready(favorites) if favorites.is_empty() => {
                f.render_widget(
                    Paragraph::new("No favorites yet. Press f while a track plays.")
                        .style(Style::default().fg(colors::NEUTRAL)),
                    chunks[0],
                );
            }
            PanelState::Ready(favorites) => {
                let page = paginate(favorites.len(), self.page, PAGE_SIZE);
                self.page = page.number;

                let current = ctx.audio_system.current_track();
                let now = NowPlaying {
                    track: current.as_ref(),
                    is_playing: ctx.audio_system.is_playing(),
                };
                let list = track_list(page.slice(favorites.items()), &now, &state.data);
                if self.list_state.selected().is_none() {
                    self.list_state.select(Some(0));
                }
                f.render_stateful_widget(list, chunks[0], &mut self.list_state);

                let footer = format!(
                    "Page {}/{} · {} favorites · Enter play · d remove · r refresh",
                    page.number,
                    page.total,
                    favorites.len()
                );
                f.render_widget(
                    Paragraph::new(footer).style(Style::default().fg(colors::NEUTRAL)),
                    chunks[1],
                );
            }
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        let items = Self::items(state);
        let page = paginate(items.len(), self.page, PAGE_SIZE);
        let visible = page.slice(items);
        let selected = self.list_state.selected().unwrap_or(0);

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_state
                    .select(step(self.list_state.selected(), visible.len(), 1));
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_state
                    .select(step(self.list_state.selected(), visible.len(), -1));
                Some(Action::None)
            }
            KeyCode::Char('[') => {
                self.page = paginate(items.len(), page.number.saturating_sub(1), PAGE_SIZE).number;
                self.list_state.select(Some(0));
                Some(Action::None)
            }
            KeyCode::Char(']') => {
                self.page = paginate(items.len(), page.number + 1, PAGE_SIZE).number;
                self.list_state.select(Some(0));
                Some(Action::None)
            }
            KeyCode::Char('r') => {
                let _ = ctx.event_tx.send(Event::RefreshAccount);
                Some(Action::None)
            }
            KeyCode::Char('d') | KeyCode::Char('F') => {
                visible.get(selected).cloned().map(Action::ToggleFavorite)
            }
            KeyCode::Enter => {
                let focus = visible.get(selected).cloned()?;
                Some(Action::PlayList(items.to_vec(), focus))
            }
            _ => None,
        }
    }
}
