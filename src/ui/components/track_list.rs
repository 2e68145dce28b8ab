use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crate::{
    model::Track,
    ui::{state::AppData, util::get_active_track_icon},
    util::colors,
};

/// What a track row needs to know about the player.
pub struct NowPlaying<'a> {
    pub track: Option<&'a Track>,
    pub is_playing: bool,
}

/// Rows for `tracks`, marking the playing one and favorites.
pub fn track_list<'a>(tracks: &'a [Track], now: &NowPlaying<'_>, data: &AppData) -> List<'a> {
    let items: Vec<ListItem> = tracks
        .iter()
        .map(|track| {
            let is_current = now.track.is_some_and(|t| t.same_as(track));
            let prefix = if is_current {
                format!("{} ", get_active_track_icon(now.is_playing))
            } else {
                "  ".to_string()
            };
            let heart = if data.is_favorite(track) { " ♥" } else { "" };

            let line = Line::from(vec![
                Span::raw(prefix),
                Span::raw(track.name.as_str()),
                Span::raw(" - "),
                Span::raw(track.display_artist()),
                Span::styled(heart, Style::default().fg(colors::PRIMARY)),
                Span::styled(
                    format!("  [{}]", track.source),
                    Style::default().fg(colors::NEUTRAL),
                ),
            ]);

            let mut item = ListItem::new(line);
            if is_current {
                item = item.style(
                    Style::default()
                        .fg(colors::SECONDARY)
                        .add_modifier(Modifier::BOLD),
                );
            }
            item
        })
        .collect();

    List::new(items)
        .highlight_style(
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}

/// Moves a list selection by `delta`, clamped to `len`.
pub fn step(selected: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = selected.unwrap_or(0) as isize;
    Some((current + delta).clamp(0, len as isize - 1) as usize)
}
