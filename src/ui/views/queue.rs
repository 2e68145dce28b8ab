use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{ListState, Paragraph},
};

use crate::{
    ui::{
        components::track_list::{NowPlaying, step, track_list},
        context::AppContext,
        state::AppState,
        traits::{Action, View},
    },
    util::colors,
};

#[derive(Default)]
pub struct Queue {
    list_state: ListState,
}

#[async_trait]
impl View for Queue {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let queue = ctx.audio_system.queue();
        if queue.is_empty() {
            f.render_widget(
                Paragraph::new("The queue is empty").style(Style::default().fg(colors::NEUTRAL)),
                chunks[0],
            );
            return;
        }

        let current = ctx
            .audio_system
            .current_index()
            .and_then(|i| queue.get(i));
        let now = NowPlaying {
            track: current,
            is_playing: ctx.audio_system.is_playing(),
        };
        let list = track_list(queue, &now, &state.data);

        if self.list_state.selected().is_none() {
            self.list_state.select(ctx.audio_system.current_index().or(Some(0)));
        }
        f.render_stateful_widget(list, chunks[0], &mut self.list_state);

        let mode = ctx.audio_system.mode();
        let footer = format!(
            "{} tracks · {} {} · m cycle mode",
            queue.len(),
            mode.icon(),
            mode.label()
        );
        f.render_widget(
            Paragraph::new(footer).style(Style::default().fg(colors::NEUTRAL)),
            chunks[1],
        );
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        let queue_len = ctx.audio_system.queue().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_state
                    .select(step(self.list_state.selected(), queue_len, 1));
                Some(Action::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_state
                    .select(step(self.list_state.selected(), queue_len, -1));
                Some(Action::None)
            }
            KeyCode::Char('g') => {
                self.list_state.select(step(Some(0), queue_len, 0));
                Some(Action::None)
            }
            KeyCode::Char('G') => {
                self.list_state
                    .select(step(Some(queue_len), queue_len, 0));
                Some(Action::None)
            }
            KeyCode::Enter => self.list_state.selected().map(Action::PlayIndex),
            _ => None,
        }
    }
}
