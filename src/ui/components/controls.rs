use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Style, Stylize},
    symbols::{self, border},
    text::{Line, ToSpan},
    widgets::{Block, Borders, Gauge, Paragraph, Widget},
};

use crate::{audio::queue::PlayMode, util::colors};

/// Play mode, favorite marker and volume, right of the progress bar.
pub struct PlayerControlsWidget {
    mode: PlayMode,
    volume: u8,
    muted: bool,
    favorite: Option<bool>,
}

impl PlayerControlsWidget {
    /// `favorite` is `None` when there is no track or no session.
    pub fn new(mode: PlayMode, volume: u8, muted: bool, favorite: Option<bool>) -> Self {
        Self {
            mode,
            volume,
            muted,
            favorite,
        }
    }
}

impl Widget for PlayerControlsWidget {
    fn render(self, area: ratatui::prelude::Rect, buf: &mut ratatui::prelude::Buffer)
    where
        Self: Sized,
    {
        let mode_icon = match self.mode {
            PlayMode::Order => self.mode.icon().fg(colors::NEUTRAL),
            _ => self.mode.icon().fg(colors::PRIMARY),
        };
        let favorite_icon = match self.favorite {
            Some(true) => "♥".fg(colors::PRIMARY),
            Some(false) => "♡".fg(colors::NEUTRAL),
            None => " ".to_span(),
        };

        let mut controls_text = Line::default();
        controls_text.push_span(mode_icon);
        controls_text.push_span("  ");
        controls_text.push_span(favorite_icon);

        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(12), Constraint::Length(12)])
            .split(area);

        let mode_label = self.mode.label();
        let controls_block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .title_bottom(mode_label.to_span().fg(colors::NEUTRAL))
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                top_right: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                bottom_right: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });
        let controls = Paragraph::new(controls_text)
            .block(controls_block)
            .centered();
        controls.render(layout[0], buf);

        let volume_text = format!("{}%", self.volume);
        let (ratio, label) = if self.muted {
            (0.0, "muted".to_span().fg(colors::NEUTRAL))
        } else {
            (
                self.volume.min(100) as f64 / 100.0,
                volume_text.to_span(),
            )
        };

        let volume_block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::Set {
                top_right: symbols::line::ROUNDED.vertical_left,
                top_left: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });

        let volume_gauge = Gauge::default()
            .block(volume_block)
            .gauge_style(Style::new().fg(colors::PRIMARY).bg(colors::NEUTRAL))
            .ratio(ratio)
            .label(label);

        volume_gauge.render(layout[1], buf);
    }
}
