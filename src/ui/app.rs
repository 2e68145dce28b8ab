use std::sync::Arc;

use flume::Receiver;
use ratatui::Frame;
use tracing::info;

use crate::{
    audio::{
        analyzer::FrequencyAnalyzer, config::AudioConfig, playback::PlaybackEngine,
        system::AudioSystem,
    },
    config::AppConfig,
    event::{Event, events::keys},
    http::ApiService,
    ui::{
        context::AppContext,
        layout::AppLayout,
        message::AppMessage,
        router::Router,
        state::{AppState, PanelState, Status, Tab},
        traits::View,
        tui::{self, TerminalEvent},
        util::handler::EventHandler,
        views::{Account, Charts, Favorites, Lyrics, Queue, Search},
    },
    util::task::TaskManager,
};

pub struct App {
    pub event_rx: Receiver<Event>,
    pub ctx: AppContext,
    pub state: AppState,
    pub router: Router,
    pub task_manager: TaskManager,
    pub analyzer: FrequencyAnalyzer,
    pub has_focus: bool,
    pub should_quit: bool,
    _engine: PlaybackEngine,
}

impl App {
    pub fn new(config: AppConfig) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let api = Arc::new(ApiService::new(&config)?);
        let engine = PlaybackEngine::new()?;
        let audio_system = AudioSystem::new(
            engine.output(),
            event_tx.clone(),
            Arc::new(api.catalog.clone()),
            AudioConfig::from(&config),
        );
        let analyzer = audio_system.analyzer();

        let mut state = AppState::default();
        state.ui.source = config.default_source;
        state.data.user = api.session().username();
        info!("Using {} at {}", config.default_source, config.api_base);

        let views: Vec<Box<dyn View>> = vec![
            Box::new(Search::default()),
            Box::new(Charts::default()),
            Box::new(Favorites::default()),
            Box::new(Queue::default()),
            Box::new(Account::default()),
        ];

        Ok(Self {
            event_rx,
            ctx: AppContext {
                config,
                api,
                audio_system,
                event_tx,
            },
            state,
            router: Router::new(views),
            task_manager: TaskManager::new(),
            analyzer,
            has_focus: true,
            should_quit: false,
            _engine: engine,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?.mouse(true);
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui).await?;
        let mut should_render = true;
        while !self.should_quit {
            if should_render {
                tui.draw(|f| self.ui(f))?;
            }
            should_render = EventHandler::handle_events(self, &mut tui).await?;
        }

        self.task_manager.abort_all();
        self.ctx.audio_system.stop().await;
        tui.exit()?;
        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        if self.has_focus {
            let area = frame.area();
            AppLayout::new(self).render(frame, area);
        }
    }

    pub fn open_lyrics(&mut self) {
        self.router.set_overlay(Box::new(Lyrics));
    }

    /// Drops the lyrics of a track that is no longer playing.
    pub fn clear_lyrics(&mut self) {
        self.task_manager.abort(keys::LYRICS);
        self.state.data.lyrics = PanelState::Idle;
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.router.clear_overlay();
        self.router.select(tab.index());
        self.state.ui.tab = tab;
    }

    /// Applies one global key binding.
    pub async fn update(&mut self, msg: AppMessage) {
        let audio = &mut self.ctx.audio_system;
        match msg {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::TogglePlayPause => audio.play_pause().await,
            AppMessage::NextTrack => {
                if !audio.play_next().await {
                    self.clear_lyrics();
                }
            }
            AppMessage::PreviousTrack => audio.play_previous().await,
            AppMessage::VolumeUp => audio.volume_up(),
            AppMessage::VolumeDown => audio.volume_down(),
            AppMessage::SeekForward => audio.seek_forwards().await,
            AppMessage::SeekBackward => audio.seek_backwards().await,
            AppMessage::ToggleMute => audio.toggle_mute(),
            AppMessage::CycleMode => {
                let mode = audio.cycle_mode();
                self.state.ui.status = Some(Status::Info(format!("Play mode: {}", mode.label())));
            }
            AppMessage::ToggleFavorite => match audio.current_track() {
                Some(track) => {
                    let _ = self.ctx.event_tx.send(Event::ToggleFavorite(track));
                }
                None => {
                    self.state.ui.status = Some(Status::Error("Nothing is playing".to_string()));
                }
            },
            AppMessage::ToggleLyrics => {
                if self.router.has_overlay() {
                    self.router.clear_overlay();
                } else {
                    self.open_lyrics();
                }
            }
            AppMessage::GoBack => self.router.clear_overlay(),
            AppMessage::NextTab => self.switch_tab(self.state.ui.tab.next()),
            AppMessage::PreviousTab => self.switch_tab(self.state.ui.tab.previous()),
            AppMessage::SetTab(index) => self.switch_tab(Tab::from_index(index)),
        }
    }
}
