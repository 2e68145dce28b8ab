use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    symbols::{self, border},
    widgets::{Block, Borders, Widget},
};

use crate::{
    audio::{progress::TrackProgress, queue::PlayMode, state::PlaybackState},
    ui::components::{
        controls::PlayerControlsWidget, progress::ProgressWidget, spectrum::SpectrumSurface,
    },
    visualizer::{BAND_COUNT, Visualizer},
};

/// Bottom bar: progress, spectrum and controls.
pub struct PlayerWidget<'a> {
    pub progress: &'a TrackProgress,
    pub state: &'a PlaybackState,
    pub mode: PlayMode,
    pub volume: u8,
    pub muted: bool,
    pub favorite: Option<bool>,
    pub visualizer: &'a Visualizer,
}

impl Widget for PlayerWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(20),
                Constraint::Length(BAND_COUNT as u16 + 2),
                Constraint::Length(24),
            ])
            .split(area);

        ProgressWidget::new(self.progress, self.state).render(layout[0], buf);

        let spectrum_block = Block::default()
            .borders(Borders::TOP | Borders::BOTTOM)
            .border_set(border::Set {
                top_left: symbols::line::ROUNDED.horizontal_down,
                bottom_left: symbols::line::ROUNDED.horizontal_up,
                ..symbols::border::ROUNDED
            });
        let spectrum_area = spectrum_block.inner(layout[1]);
        spectrum_block.render(layout[1], buf);
        self.visualizer
            .paint(&mut SpectrumSurface::new(spectrum_area, buf));

        PlayerControlsWidget::new(self.mode, self.volume, self.muted, self.favorite)
            .render(layout[2], buf);
    }
}
