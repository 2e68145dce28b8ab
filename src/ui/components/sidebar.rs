use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{List, ListItem, Paragraph, Widget},
};

use crate::{model::Source, ui::state::Tab, util::colors};

pub struct Sidebar<'a> {
    selected: Tab,
    user: Option<&'a str>,
    source: Source,
}

impl<'a> Sidebar<'a> {
    pub fn new(selected: Tab, user: Option<&'a str>, source: Source) -> Self {
        Self {
            selected,
            user,
            source,
        }
    }
}

impl<'a> Widget for Sidebar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(area);

        let items: Vec<ListItem> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| {
                let style = if *tab == self.selected {
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors::NEUTRAL)
                };
                ListItem::new(format!("{} {}", i + 1, tab.label())).style(style)
            })
            .collect();

        List::new(items).render(chunks[0], buf);

        let user = match self.user {
            Some(name) => Line::styled(format!("  {name}"), Style::default().fg(colors::ACCENT)),
            None => Line::styled("  not signed in", Style::default().fg(colors::NEUTRAL)),
        };
        let source = Line::styled(
            format!("  {}", self.source.label()),
            Style::default().fg(colors::NEUTRAL),
        );
        Paragraph::new(vec![user, source]).render(chunks[1], buf);
    }
}
