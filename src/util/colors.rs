use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x00f7d44b);
pub const SECONDARY: Color = Color::from_u32(0x009D8400);
pub const NEUTRAL: Color = Color::from_u32(0x00404040);
pub const BACKGROUND: Color = Color::from_u32(0x000d0d0d);
pub const ACCENT: Color = Color::from_u32(0x00feca88);
pub const ERROR: Color = Color::from_u32(0x00e5534b);

/// Card accents of the chart grid, used in turn.
pub const CHART_ACCENTS: [Color; 5] = [
    Color::from_u32(0x00f7d44b),
    Color::from_u32(0x0068c3f2),
    Color::from_u32(0x00f28fad),
    Color::from_u32(0x0083e0a6),
    Color::from_u32(0x00b59cf7),
];

pub fn chart_accent(index: usize) -> Color {
    CHART_ACCENTS[index % CHART_ACCENTS.len()]
}

const BACKGROUND_RGB: (u8, u8, u8) = (0x0d, 0x0d, 0x0d);

/// `hsla(hue, saturation, lightness, alpha)` composited over [`BACKGROUND`].
/// Saturation and lightness are fractions in `[0, 1]`.
pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color {
    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
    let alpha = alpha.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| (fg as f32 * alpha + bg as f32 * (1.0 - alpha)).round() as u8;
    Color::Rgb(
        mix(r, BACKGROUND_RGB.0),
        mix(g, BACKGROUND_RGB.1),
        mix(b, BACKGROUND_RGB.2),
    )
}

pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |v: f32| ((v + m) * 255.0).round() as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}
