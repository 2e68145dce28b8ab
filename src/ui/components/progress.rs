use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    symbols::{self, border},
    text::ToSpan,
    widgets::{Block, Borders, Widget},
};

use crate::{
    audio::{progress::TrackProgress, state::PlaybackState},
    ui::components::gauge::CustomGauge,
    util::colors,
};

pub struct ProgressWidget<'a> {
    progress: &'a TrackProgress,
    state: &'a PlaybackState,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(progress: &'a TrackProgress, state: &'a PlaybackState) -> Self {
        Self { progress, state }
    }

    fn title(&self) -> String {
        let icon = self.state.icon();
        match (self.state, self.state.track()) {
            (_, Some(t)) => format!("{icon}  {} by {}", t.name, t.display_artist()),
            (PlaybackState::Error(reason), None) => format!("{icon}  {reason}"),
            _ => "No track".to_string(),
        }
    }
}

impl<'a> Widget for ProgressWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (current, total) = self.progress.get_progress();
        let duration_info = format!("{} / {}", format_duration(current), format_duration(total));

        let title_style = if matches!(self.state, PlaybackState::Error(_)) {
            Style::default().fg(colors::ERROR)
        } else {
            Style::default()
        };

        let title = self.title();
        let gauge = CustomGauge::default()
            .block(
                Block::default()
                    .title_top(title.to_span().style(title_style))
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_set(border::Set {
                        top_right: symbols::line::ROUNDED.horizontal_down,
                        bottom_right: symbols::line::ROUNDED.horizontal_up,
                        ..symbols::border::ROUNDED
                    }),
            )
            .ratio(self.progress.ratio())
            .label(duration_info.to_span().fg(Color::White))
            .filled_style(Style::default().fg(colors::PRIMARY).bg(colors::SECONDARY))
            .remaining_style(
                Style::default()
                    .fg(colors::BACKGROUND)
                    .bg(colors::BACKGROUND),
            );

        gauge.render(area, buf);
    }
}

pub fn format_duration(duration_ms: u64) -> String {
    let total_seconds = duration_ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_render_as_minutes_and_seconds() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(61_500), "01:01");
        assert_eq!(format_duration(3_600_000), "60:00");
    }
}
