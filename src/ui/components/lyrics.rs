use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    lyrics::{LyricsSync, NO_LYRICS},
    ui::state::PanelState,
    util::colors,
};

/// The lyrics window, centered, with the active line highlighted.
pub struct LyricsWidget<'a> {
    lyrics: &'a PanelState<LyricsSync>,
}

impl<'a> LyricsWidget<'a> {
    pub fn new(lyrics: &'a PanelState<LyricsSync>) -> Self {
        Self { lyrics }
    }
}

fn centered(buf: &mut Buffer, area: Rect, y: u16, text: &str, style: Style) {
    let w = UnicodeWidthStr::width(text) as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    buf.set_stringn(x, y, text, area.width as usize, style);
}

impl Widget for LyricsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let middle = area.y + area.height / 2;

        let sync = match self.lyrics {
            PanelState::Ready(sync) => sync,
            PanelState::Loading => {
                centered(buf, area, middle, "Loading lyrics...", Style::default().fg(colors::NEUTRAL));
                return;
            }
            PanelState::Idle | PanelState::Failed(_) => {
                centered(buf, area, middle, NO_LYRICS, Style::default().fg(colors::NEUTRAL));
                return;
            }
        };

        let (start, lines) = sync.window();
        let block_h = lines.len() as u16;
        let top = area.y + area.height.saturating_sub(block_h) / 2;

        for (offset, line) in lines.iter().enumerate() {
            let y = top + offset as u16;
            if y >= area.bottom() {
                break;
            }
            let style = if sync.active() == Some(start + offset) {
                Style::default()
                    .fg(colors::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors::NEUTRAL)
            };
            centered(buf, area, y, &line.text, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
            .trim()
            .to_string()
    }

    #[test]
    fn active_line_sits_in_the_window() {
        let mut sync = LyricsSync::from_lrc("[00:00.00]a\n[00:01.00]b\n[00:02.00]c\n[00:03.00]d");
        sync.update(2.5);
        let state = PanelState::Ready(sync);

        let area = Rect::new(0, 0, 20, 5);
        let mut buf = Buffer::empty(area);
        LyricsWidget::new(&state).render(area, &mut buf);

        // window starts two lines before "c"
        assert_eq!(row(&buf, 0), "a");
        assert_eq!(row(&buf, 2), "c");
        assert_eq!(buf[(9, 2)].style().fg, Some(colors::ACCENT));
    }

    #[test]
    fn failure_shows_the_placeholder() {
        let state = PanelState::Failed("Network error".to_string());
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        LyricsWidget::new(&state).render(area, &mut buf);
        assert_eq!(row(&buf, 1), NO_LYRICS);
    }
}
