use ratatui::{buffer::Buffer, layout::Rect, symbols};

use crate::{
    util::colors,
    visualizer::{Bar, Surface},
};

const SATURATION: f32 = 0.8;
const LIGHTNESS: f32 = 0.6;

/// Draws a frame of bars into a region of a terminal buffer. Bars are scaled
/// so the reference height fills the region; anything taller is clipped.
pub struct SpectrumSurface<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> SpectrumSurface<'a> {
    pub fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }
}

fn eighths_symbol(eighths: u16) -> &'static str {
    match eighths {
        0 => " ",
        1 => symbols::bar::ONE_EIGHTH,
        2 => symbols::bar::ONE_QUARTER,
        3 => symbols::bar::THREE_EIGHTHS,
        4 => symbols::bar::HALF,
        5 => symbols::bar::FIVE_EIGHTHS,
        6 => symbols::bar::THREE_QUARTERS,
        7 => symbols::bar::SEVEN_EIGHTHS,
        _ => symbols::bar::FULL,
    }
}

impl Surface for SpectrumSurface<'_> {
    fn paint(&mut self, bars: &[Bar], reference_height: f32) {
        let area = self.area.intersection(self.buf.area);
        if area.is_empty() || bars.is_empty() || reference_height <= 0.0 {
            return;
        }

        let rows = area.height;
        let scale = rows as f32 * 8.0 / reference_height;
        let width = area.width as usize;
        let count = bars.len();

        for (i, bar) in bars.iter().enumerate() {
            let x0 = (i * width / count) as u16;
            let x1 = ((i + 1) * width / count) as u16;
            if x1 <= x0 {
                continue;
            }
            // keep a gutter between wide bars
            let x1 = if x1 - x0 >= 3 { x1 - 1 } else { x1 };

            let fg = colors::hsla(bar.hue, SATURATION, LIGHTNESS, bar.alpha);
            let peak_fg = colors::hsla(bar.hue, SATURATION, 0.8, 1.0);

            let filled = ((bar.height * scale).round() as u32).min(rows as u32 * 8) as u16;
            let peak_row = ((bar.peak * scale / 8.0).ceil() as u16).min(rows);

            for row in 0..rows {
                let y = area.bottom() - 1 - row;
                let level = filled.saturating_sub(row * 8).min(8);
                for x in area.left() + x0..area.left() + x1 {
                    let cell = &mut self.buf[(x, y)];
                    if level > 0 {
                        cell.set_symbol(eighths_symbol(level)).set_fg(fg);
                    } else if row + 1 == peak_row {
                        cell.set_symbol(symbols::line::HORIZONTAL).set_fg(peak_fg);
                    } else {
                        cell.set_symbol(" ");
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::{BAND_COUNT, REFERENCE_HEIGHT};

    fn bars(height: f32, peak: f32) -> Vec<Bar> {
        vec![
            Bar {
                energy: 1.0,
                height,
                peak,
                hue: 280.0,
                alpha: 0.95,
            };
            BAND_COUNT
        ]
    }

    #[test]
    fn full_bar_fills_its_column() {
        let area = Rect::new(0, 0, 36, 4);
        let mut buf = Buffer::empty(area);
        SpectrumSurface::new(area, &mut buf).paint(&bars(REFERENCE_HEIGHT * 1.2, 0.0), REFERENCE_HEIGHT);

        for y in 0..4 {
            assert_eq!(buf[(0, y)].symbol(), symbols::bar::FULL);
        }
    }

    #[test]
    fn half_bar_and_floating_peak() {
        let area = Rect::new(0, 0, 36, 4);
        let mut buf = Buffer::empty(area);
        SpectrumSurface::new(area, &mut buf)
            .paint(&bars(REFERENCE_HEIGHT / 2.0, REFERENCE_HEIGHT), REFERENCE_HEIGHT);

        assert_eq!(buf[(5, 3)].symbol(), symbols::bar::FULL);
        assert_eq!(buf[(5, 2)].symbol(), symbols::bar::FULL);
        assert_eq!(buf[(5, 1)].symbol(), " ");
        assert_eq!(buf[(5, 0)].symbol(), symbols::line::HORIZONTAL);
    }

    #[test]
    fn tiny_area_is_ignored() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        SpectrumSurface::new(area, &mut buf).paint(&bars(10.0, 10.0), REFERENCE_HEIGHT);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 4, 4)));
    }
}
