use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Block, Widget},
};

/// Horizontal gauge with eighth-block resolution and a label cut into the
/// middle of the bar.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CustomGauge<'a> {
    block: Option<Block<'a>>,
    ratio: f64,
    label: Option<Span<'a>>,
    style: Style,
    filled_style: Style,
    remaining_style: Style,
}

impl<'a> CustomGauge<'a> {
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Clamped into `[0, 1]`.
    pub fn ratio(mut self, ratio: f64) -> Self {
        self.ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn label<T>(mut self, label: T) -> Self
    where
        T: Into<Span<'a>>,
    {
        self.label = Some(label.into());
        self
    }

    pub fn style<S: Into<Style>>(mut self, style: S) -> Self {
        self.style = style.into();
        self
    }

    pub fn filled_style<S: Into<Style>>(mut self, style: S) -> Self {
        self.filled_style = style.into();
        self
    }

    pub fn remaining_style<S: Into<Style>>(mut self, style: S) -> Self {
        self.remaining_style = style.into();
        self
    }
}

fn get_unicode_block(frac: f64) -> &'static str {
    match (frac * 8.0).round() as u16 {
        0 => " ",
        1 => symbols::block::ONE_EIGHTH,
        2 => symbols::block::ONE_QUARTER,
        3 => symbols::block::THREE_EIGHTHS,
        4 => symbols::block::HALF,
        5 => symbols::block::FIVE_EIGHTHS,
        6 => symbols::block::THREE_QUARTERS,
        7 => symbols::block::SEVEN_EIGHTHS,
        _ => symbols::block::FULL,
    }
}

impl Widget for CustomGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style);
        if let Some(ref block) = self.block {
            block.render(area, buf);
        }

        let inner = self.block.as_ref().map_or(area, |b| b.inner(area));
        if inner.is_empty() {
            return;
        }

        self.render_gauge(inner, buf);
    }
}

impl CustomGauge<'_> {
    fn render_gauge(&self, gauge_area: Rect, buf: &mut Buffer) {
        let filled_pos = gauge_area.width as f64 * self.ratio;

        let label = match self.label.as_ref() {
            Some(label) => label.clone(),
            None => Span::raw(format!("{}%", (self.ratio * 100.0).round() as u16)),
        };
        let label_width = (label.width() as u16).min(gauge_area.width);
        let label_col = gauge_area.left() + (gauge_area.width - label_width) / 2;
        let label_row = gauge_area.top() + gauge_area.height / 2;

        for y in gauge_area.top()..gauge_area.bottom() {
            for x in gauge_area.left()..gauge_area.right() {
                let pos = (x - gauge_area.left()) as f64;

                let (mut symbol, mut style) = if pos < filled_pos {
                    let symbol = if pos + 1.0 > filled_pos {
                        get_unicode_block(filled_pos - pos)
                    } else {
                        symbols::block::FULL
                    };
                    (symbol, self.filled_style)
                } else {
                    (" ", self.remaining_style)
                };

                if y == label_row && x >= label_col && x < label_col + label_width {
                    symbol = " ";
                    style = style.bg(style.fg.unwrap_or_default());
                }

                buf[(x, y)]
                    .set_symbol(symbol)
                    .set_fg(style.fg.unwrap_or_default())
                    .set_bg(style.bg.unwrap_or_default());
            }
        }

        buf.set_span(label_col, label_row, &label, label_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_ratio_fills_half_the_cells() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        CustomGauge::default().ratio(0.5).label("").render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), symbols::block::FULL);
        assert_eq!(buf[(4, 0)].symbol(), symbols::block::FULL);
        assert_eq!(buf[(5, 0)].symbol(), " ");
    }

    #[test]
    fn ratio_is_clamped() {
        let gauge = CustomGauge::default().ratio(3.0);
        assert_eq!(gauge.ratio, 1.0);
        let gauge = CustomGauge::default().ratio(f64::NAN);
        assert_eq!(gauge.ratio, 0.0);
    }
}
