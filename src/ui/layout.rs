use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::{self, border},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    ui::{
        app::App,
        components::{player::PlayerWidget, sidebar::Sidebar},
        state::Status,
    },
    util::colors,
};

const KEY_HINTS: &str = "space play · n/p skip · m mode · y lyrics · f favorite · tab switch";

pub struct AppLayout<'a> {
    pub app: &'a mut App,
}

impl<'a> AppLayout<'a> {
    pub fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub fn render(self, f: &mut Frame, area: Rect) {
        let buf = f.buffer_mut();
        buf.set_style(area, Style::new().bg(colors::BACKGROUND));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        let main_area = chunks[0];
        let player_area = chunks[1];
        let status_area = chunks[2];

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(1)])
            .split(main_area);

        let sidebar_area = main_chunks[0];
        let content_area = main_chunks[1];
        let sidebar_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .title("tunehub")
            .title_alignment(Alignment::Center);

        let content_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::Set {
                ..symbols::border::ROUNDED
            });

        let sidebar_inner = sidebar_block.inner(sidebar_area);
        let content_inner = content_block.inner(content_area);

        f.render_widget(sidebar_block, sidebar_area);
        f.render_widget(content_block, content_area);

        let app = self.app;
        f.render_widget(
            Sidebar::new(
                app.state.ui.tab,
                app.state.data.user.as_deref(),
                app.state.ui.source,
            ),
            sidebar_inner,
        );

        app.router
            .render(f, content_inner, &app.state, &app.ctx);

        let audio = &app.ctx.audio_system;
        let playback = audio.state();
        let favorite = match (&app.state.data.user, audio.current_track()) {
            (Some(_), Some(track)) => Some(app.state.data.is_favorite(&track)),
            _ => None,
        };
        let player_widget = PlayerWidget {
            progress: audio.track_progress(),
            state: &playback,
            mode: audio.mode(),
            volume: audio.volume(),
            muted: audio.is_muted(),
            favorite,
            visualizer: &app.state.ui.visualizer,
        };
        f.render_widget(player_widget, player_area);

        let status = match &app.state.ui.status {
            Some(Status::Info(text)) => {
                Span::styled(format!(" {text}"), Style::default().fg(colors::ACCENT))
            }
            Some(Status::Error(text)) => {
                Span::styled(format!(" {text}"), Style::default().fg(colors::ERROR))
            }
            None => Span::styled(
                format!(" {KEY_HINTS}"),
                Style::default().fg(colors::NEUTRAL),
            ),
        };
        f.render_widget(Paragraph::new(Line::from(status)), status_area);
    }
}
