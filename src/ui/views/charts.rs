use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, ListState, Paragraph},
};

use crate::{
    event::Event,
    model::{ChartSummary, Track},
    ui::{
        components::{
            spinner::Spinner,
            track_list::{NowPlaying, step, track_list},
        },
        context::AppContext,
        state::{AppState, PanelState},
        traits::{Action, View},
    },
    util::colors,
};

/// Charts shown before the grid is expanded.
pub const COLLAPSED_COUNT: usize = 5;
const GRID_COLUMNS: usize = 3;
const CARD_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Grid,
    Tracks,
}

pub struct Charts {
    charts: PanelState<Vec<ChartSummary>>,
    show_all: bool,
    selected: usize,
    active: Option<ChartSummary>,
    tracks: PanelState<Vec<Track>>,
    list_state: ListState,
    focus: Focus,
}

impl Default for Charts {
    fn default() -> Self {
        Self {
            charts: PanelState::Loading,
            show_all: false,
            selected: 0,
            active: None,
            tracks: PanelState::Idle,
            list_state: ListState::default(),
            focus: Focus::Grid,
        }
    }
}

impl Charts {
    fn visible(&self) -> &[ChartSummary] {
        match self.charts.ready() {
            Some(charts) if self.show_all => charts,
            Some(charts) => &charts[..charts.len().min(COLLAPSED_COUNT)],
            None => &[],
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let charts = match &self.charts {
            PanelState::Ready(charts) if charts.is_empty() => {
                f.render_widget(Paragraph::new("No charts for this source"), area);
                return;
            }
            PanelState::Ready(_) => self.visible(),
            PanelState::Failed(reason) => {
                f.render_widget(
                    Paragraph::new(reason.as_str()).style(Style::default().fg(colors::ERROR)),
                    area,
                );
                return;
            }
            PanelState::Idle | PanelState::Loading => {
                f.render_widget(
                    Spinner::default()
                        .with_style(Style::default().fg(colors::PRIMARY))
                        .with_label("Loading charts..."),
                    area,
                );
                return;
            }
        };

        let rows = charts.len().div_ceil(GRID_COLUMNS);
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
            .split(area);

        for (row, row_area) in row_areas.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row_area);

            for (col, cell) in cells.iter().enumerate() {
                let index = row * GRID_COLUMNS + col;
                let Some(chart) = charts.get(index) else {
                    break;
                };
                let accent = colors::chart_accent(index);
                let selected = self.focus == Focus::Grid && index == self.selected;
                let border_type = if selected {
                    BorderType::Thick
                } else {
                    BorderType::Rounded
                };
                let card = Paragraph::new(vec![
                    Line::styled(
                        chart.name.as_str(),
                        Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(chart.frequency_label(), Style::default().fg(colors::NEUTRAL)),
                ])
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(border_type)
                        .border_style(Style::default().fg(accent)),
                );
                f.render_widget(card, *cell);
            }
        }
    }
}

#[async_trait]
impl View for Charts {
    fn render(&mut self, f: &mut Frame, area: Rect, state: &AppState, ctx: &AppContext) {
        let grid_rows = self.visible().len().div_ceil(GRID_COLUMNS).max(1) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Max(grid_rows * CARD_HEIGHT),
                Constraint::Min(3),
            ])
            .split(area);

        let total = self.charts.ready().map_or(0, Vec::len);
        let header = format!(
            "{} charts · {} · a {} · s source",
            state.ui.source.label(),
            total,
            if self.show_all { "collapse" } else { "show all" },
        );
        f.render_widget(
            Paragraph::new(header).style(Style::default().fg(colors::NEUTRAL)),
            chunks[0],
        );

        self.render_grid(f, chunks[1]);

        let border = if self.focus == Focus::Tracks {
            colors::PRIMARY
        } else {
            colors::NEUTRAL
        };
        let title = self
            .active
            .as_ref()
            .map_or("Pick a chart".to_string(), |c| c.name.clone());
        let block = Block::default()
            .borders(Borders::TOP)
            .title(title)
            .border_style(Style::default().fg(border));
        let tracks_area = block.inner(chunks[2]);
        f.render_widget(block, chunks[2]);

        match &self.tracks {
            PanelState::Idle => {}
            PanelState::Loading => f.render_widget(
                Spinner::default()
                    .with_style(Style::default().fg(colors::PRIMARY))
                    .with_label("Loading tracks..."),
                tracks_area,
            ),
            PanelState::Failed(reason) => f.render_widget(
                Paragraph::new(reason.as_str()).style(Style::default().fg(colors::ERROR)),
                tracks_area,
            ),
            PanelState::Ready(tracks) => {
                let current = ctx.audio_system.current_track();
                let now = NowPlaying {
                    track: current.as_ref(),
                    is_playing: ctx.audio_system.is_playing(),
                };
                let list = track_list(tracks, &now, &state.data);
                f.render_stateful_widget(list, tracks_area, &mut self.list_state);
            }
        }
    }

    async fn handle_input(
        &mut self,
        key: KeyEvent,
        _state: &AppState,
        ctx: &AppContext,
    ) -> Option<Action> {
        match key.code {
            KeyCode::Char('s') => {
                let _ = ctx.event_tx.send(Event::CycleSource);
                return Some(Action::None);
            }
            KeyCode::Char('a') => {
                self.show_all = !self.show_all;
                self.selected = self.selected.min(self.visible().len().saturating_sub(1));
                return Some(Action::None);
            }
            KeyCode::Char('r') => {
                let _ = ctx.event_tx.send(Event::LoadCharts);
                return Some(Action::None);
            }
            _ => {}
        }

        match self.focus {
            Focus::Grid => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    self.move_selection(-1);
                    Some(Action::None)
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.move_selection(1);
                    Some(Action::None)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.move_selection(-(GRID_COLUMNS as isize));
                    Some(Action::None)
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.move_selection(GRID_COLUMNS as isize);
                    Some(Action::None)
                }
                KeyCode::Enter => {
                    let chart = self.visible().get(self.selected).cloned()?;
                    let _ = ctx.event_tx.send(Event::OpenChart(chart.clone()));
                    self.active = Some(chart);
                    self.tracks = PanelState::Loading;
                    self.list_state.select(Some(0));
                    self.focus = Focus::Tracks;
                    Some(Action::None)
                }
                _ => None,
            },
            Focus::Tracks => {
                let tracks = self.tracks.ready().map_or(&[][..], Vec::as_slice);
                match key.code {
                    KeyCode::Esc | KeyCode::Backspace => {
                        self.focus = Focus::Grid;
                        Some(Action::None)
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        let next = step(self.list_state.selected(), tracks.len(), 1);
                        self.list_state.select(next);
                        Some(Action::None)
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        let next = step(self.list_state.selected(), tracks.len(), -1);
                        self.list_state.select(next);
                        Some(Action::None)
                    }
                    KeyCode::Char('F') => {
                        let selected = self.list_state.selected()?;
                        tracks.get(selected).cloned().map(Action::ToggleFavorite)
                    }
                    KeyCode::Enter => {
                        let selected = self.list_state.selected().unwrap_or(0);
                        let focus = tracks.get(selected).cloned()?;
                        Some(Action::PlayList(tracks.to_vec(), focus))
                    }
                    _ => None,
                }
            }
        }
    }

    async fn on_event(&mut self, event: &Event, _ctx: &AppContext) {
        match event {
            Event::CycleSource | Event::LoadCharts => {
                self.charts = PanelState::Loading;
                self.active = None;
                self.tracks = PanelState::Idle;
                self.selected = 0;
                self.focus = Focus::Grid;
            }
            Event::ChartsLoaded { result, .. } => {
                self.charts = PanelState::from_outcome(result.clone());
                self.selected = 0;
            }
            Event::ChartTracksLoaded { chart, result, .. } => {
                if self.active.as_ref().is_some_and(|c| c.id == chart.id) {
                    self.tracks = PanelState::from_outcome(result.clone());
                    self.list_state.select(Some(0));
                }
            }
            _ => {}
        }
    }
}
