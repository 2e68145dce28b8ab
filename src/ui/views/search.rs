use async_trait::async_trait;
use flume::Sender;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, ListState, Paragraph},
};

use crate::{
    event::Event,
    model::Track,
    ui::{
        components::{
            spinner::Spinner,
            track_list::{NowPlaying, step, track_list},
        },
        context::AppContext,
        state::{AppState, PanelState},
        traits::{Action, View},
    },
    util::{colors, page::paginate},
};

pub const PAGE_SIZE: usize = 6;

pub struct Search {
    input: String,
    is_editing: bool,
    list_state: ListState,
    results: PanelState<Vec<Track>>,
    page: usize,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            input: String::new(),
            is_editing: true,
            list_state: ListState::default(),
            results: PanelState::Idle,
            page: 1,
        }
    }
}

impl Search {
    fn page_tracks(&self) -> &[Track] {
        match self.results.ready() {
            Some(tracks) => paginate(tracks.len(), self.page, PAGE_SIZE).slice(tracks),
            None => &[],
        }
    }

    fn turn_page(&mut self, delta: isize) {
        if let Some(tracks) = self.results.ready() {
            let target = (self.page as isize + delta).max(1) as usize;
            self.page = paginate(tracks.len(), target, PAGE_SIZE).number;
            self.list_state.select(Some(0));
        }
    }

    /// A blank keyword only raises a status; the previous results stay.
    fn submit(&mut self, event_tx: &Sender<Event>) {
        let keyword = self.input.trim();
        if keyword.is_empty() {
            let _ = event_tx.send(Event::Status("Please enter a keyword".to_string()));
            return;
        }
        let _ = event_tx.send(Event::Search(keyword.to_string()));
        self.results = PanelState::Loading;
        self.is_editing = false;
    }
}

#[async_trait]
impl View for Search {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        let input_style = if self.is_editing {
            Style::default().fg(colors::PRIMARY)
        } else {
            Style::default().fg(colors::NEUTRAL)
        };

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Search {}", state.ui.source.label()))
            .border_style(input_style);
        f.render_widget(Paragraph::new(self.input.as_str()).block(input_block), chunks[0]);

        let results_area = chunks[1];
        match &self.results {
            PanelState::Idle => {
                f.render_widget(
                    Paragraph::new("Type a keyword and press Enter").style(Style::default().fg(colors::NEUTRAL)),
                    results_area,
                );
            }
            PanelState::Loading => {
                let spinner = Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Searching...");
                f.render_widget(spinner, results_area);
            }
            PanelState::Failed(reason) => {
                f.render_widget(
                    Paragraph::new(reason.as_str()).style(Style::default().fg(colors::ERROR)),
                    results_area,
                );
            }
            PanelState::Ready(tracks) if tracks.is_empty() => {
                f.render_widget(Paragraph::new("No results"), results_area);
            }
            PanelState::Ready(tracks) => {
                let page = paginate(tracks.len(), self.page, PAGE_SIZE);
                let current = ctx.audio_system.current_track();
                let now = NowPlaying {
                    track: current.as_ref(),
                    is_playing: ctx.audio_system.is_playing(),
                };
                let list = track_list(page.slice(tracks), &now, &state.data);
                if self.list_state.selected().is_none() {
                    self.list_state.select(Some(0));
                }
                f.render_stateful_widget(list, results_area, &mut self.list_state);

                let footer = format!(
                    "Page {}/{} · {} results · [ ] page · s source · / edit",
                    page.number,
                    page.total,
                    tracks.len()
                );
                f.render_widget(
                    Paragraph::new(footer).style(Style::default().fg(colors::NEUTRAL)),
                    chunks[2],
                );
            }
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        if self.is_editing {
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
                KeyCode::Enter => {
                    self.submit(&ctx.event_tx);
                    Some(Action::None)
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    Some(Action::None)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    Some(Action::None)
                }
                KeyCode::Esc => {
                    self.is_editing = false;
                    Some(Action::None)
                }
                _ => None,
            }
        } else {
            let len = self.page_tracks().len();
            match key.code {
                KeyCode::Char('/') | KeyCode::Char('i') => {
                    self.is_editing = true;
                    Some(Action::None)
                }
                KeyCode::Char('s') => {
                    let _ = ctx.event_tx.send(Event::CycleSource);
                    Some(Action::None)
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.list_state.select(step(self.list_state.selected(), len, 1));
                    Some(Action::None)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.list_state.select(step(self.list_state.selected(), len, -1));
                    Some(Action::None)
                }
                KeyCode::Char('[') => {
                    self.turn_page(-1);
                    Some(Action::None)
                }
                KeyCode::Char(']') => {
                    self.turn_page(1);
                    Some(Action::None)
                }
                KeyCode::Char('F') => {
                    let selected = self.list_state.selected().unwrap_or(0);
                    self.page_tracks()
                        .get(selected)
                        .cloned()
                        .map(Action::ToggleFavorite)
                }
                KeyCode::Enter => {
                    let selected = self.list_state.selected().unwrap_or(0);
                    let focus = self.page_tracks().get(selected).cloned()?;
                    let tracks = self.results.ready()?.clone();
                    Some(Action::PlayList(tracks, focus))
                }
                _ => None,
            }
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        if let Event::SearchLoaded { result, .. } = event {
            self.results = PanelState::from_outcome(result.clone());
            self.page = 1;
            self.list_state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Source;

    fn results(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: i.to_string(),
                name: format!("Song {i}"),
                artist: "Band".into(),
                source: Source::Netease,
            })
            .collect()
    }

    fn searched(input: &str) -> Search {
        Search {
            input: input.to_string(),
            results: PanelState::Ready(results(8)),
            page: 2,
            ..Search::default()
        }
    }

    #[test]
    fn blank_keyword_keeps_results_and_only_reports() {
        let (tx, rx) = flume::unbounded();
        let mut search = searched("   ");

        search.submit(&tx);

        assert!(matches!(rx.try_recv(), Ok(Event::Status(msg)) if msg == "Please enter a keyword"));
        assert!(rx.try_recv().is_err());
        assert_eq!(search.results.ready().map(Vec::len), Some(8));
        assert_eq!(search.page, 2);
        assert!(search.is_editing);
    }

    #[test]
    fn keyword_is_trimmed_and_sent() {
        let (tx, rx) = flume::unbounded();
        let mut search = searched("  jay chou ");

        search.submit(&tx);

        assert!(matches!(rx.try_recv(), Ok(Event::Search(k)) if k == "jay chou"));
        assert!(rx.try_recv().is_err());
        assert!(matches!(search.results, PanelState::Loading));
        assert!(!search.is_editing);
    }
}
