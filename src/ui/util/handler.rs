use std::{future::Future, sync::Arc};

use ratatui::crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tracing::{debug, info, warn};

use crate::{
    event::{Event, events::keys},
    http::{ApiService, FavoritesStore, Restore},
    lyrics::LyricsSync,
    model::Track,
    ui::{
        app::App,
        input::InputHandler,
        message::AppMessage,
        state::{PanelState, Status},
        traits::Action,
        tui::{TerminalEvent, Tui},
    },
    visualizer::FrequencySource,
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await {
            if Self::handle_event(app, evt, tui).await? {
                should_render = true;
            }
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt).await;
            should_render = true;
        }

        Ok(should_render)
    }

    pub async fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => Self::startup(app),
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key).await,
            TerminalEvent::Mouse(mouse) => Self::handle_mouse_event(app, mouse).await,
            TerminalEvent::Tick => {
                Self::on_frame(app);
                return Ok(app.has_focus);
            }
        }

        Ok(true)
    }

    fn startup(app: &mut App) {
        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();
        app.task_manager.spawn(
            "restore",
            tokio::spawn(async move {
                let restore = api.auth.restore().await;
                let _ = tx.send(Event::SessionRestored(restore));
            }),
        );
        Self::load_charts(app);
    }

    /// One visualizer frame and one lyrics sync step per tick.
    fn on_frame(app: &mut App) {
        let audio = &app.ctx.audio_system;
        let visualizer = &mut app.state.ui.visualizer;
        if audio.is_playing() {
            visualizer.start();
        } else {
            visualizer.stop();
        }
        let source: &mut dyn FrequencySource = &mut app.analyzer;
        visualizer.on_frame(Some(source));

        if let Some(sync) = app.state.data.lyrics.ready_mut() {
            sync.update(audio.track_progress().position_secs());
        }
    }

    /// Runs `call` on a fresh task under `key` and posts its result wrapped by
    /// `wrap`, tagged with the request id.
    fn request<T, F, Fut, W>(app: &mut App, key: &'static str, call: F, wrap: W)
    where
        F: FnOnce(Arc<ApiService>) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        W: FnOnce(u64, T) -> Event + Send + 'static,
    {
        let tx = app.ctx.event_tx.clone();
        let call = call(app.ctx.api.clone());
        app.task_manager.spawn_request(key, move |id| async move {
            let value = call.await;
            let _ = tx.send(wrap(id, value));
        });
    }

    pub async fn handle_action(app: &mut App, evt: Event) {
        if let Some((key, id)) = evt.request() {
            if !app.task_manager.is_current(key, id) {
                debug!("Dropping stale {key} response #{id}");
                return;
            }
        }

        app.router.on_event(&evt, &app.ctx).await;

        match evt {
            Event::TrackStarted(track, duration) => {
                info!("Playing {} ({}s)", track.name, duration.as_secs());
                app.state.ui.status = None;
                app.state.data.lyrics = PanelState::Loading;
                let wanted = track.clone();
                Self::request(
                    app,
                    keys::LYRICS,
                    move |api| async move {
                        api.catalog
                            .lyrics(&wanted)
                            .await
                            .map_err(|e| e.user_message("Could not load lyrics"))
                    },
                    move |id, result| Event::LyricsLoaded { id, track, result },
                );
            }
            Event::TrackEnded => {
                if !app.ctx.audio_system.on_track_ended().await {
                    app.clear_lyrics();
                }
            }
            Event::PlaybackFailed(track, reason) => {
                warn!("Could not play {}: {reason}", track.id);
                app.state.data.lyrics = PanelState::Idle;
                app.state.ui.status = Some(Status::Error(format!(
                    "Could not play {}: {reason}",
                    track.name
                )));
            }
            Event::SessionRestored(restore) => match restore {
                Restore::Valid(user) => {
                    app.state.data.user = Some(user);
                    Self::refresh_account(app);
                }
                Restore::Rejected => {
                    app.state.data.clear_account();
                    app.state.ui.status = Some(Status::Info(
                        "Your session has expired, please sign in again".to_string(),
                    ));
                }
                Restore::Unreachable => {
                    app.state.data.user = app.ctx.api.session().username();
                    app.state.ui.status =
                        Some(Status::Error("Could not reach the server".to_string()));
                }
                Restore::NoSession => {}
            },
            Event::AuthFinished { result, .. } => match result {
                Ok(message) => {
                    app.state.data.user = app.ctx.api.session().username();
                    app.state.ui.status = Some(Status::Info(message));
                    Self::refresh_account(app);
                }
                Err(reason) => app.state.ui.status = Some(Status::Error(reason)),
            },
            Event::LyricsLoaded { track, result, .. } => {
                let current = app.ctx.audio_system.current_track();
                if current.is_some_and(|t| t.same_as(&track)) {
                    app.state.data.lyrics = match result {
                        Ok(text) => PanelState::Ready(LyricsSync::from_lrc(&text)),
                        Err(reason) => PanelState::Failed(reason),
                    };
                }
            }
            Event::FavoritesLoaded { result, .. } => match result {
                Ok(items) => {
                    app.state.data.favorites = PanelState::Ready(FavoritesStore::new(items));
                }
                Err(reason) if app.state.data.favorites.ready().is_some() => {
                    app.state.ui.status = Some(Status::Error(reason));
                }
                Err(reason) => app.state.data.favorites = PanelState::Failed(reason),
            },
            Event::FavoriteToggled { result, .. } => match result {
                Ok(items) => {
                    app.state.data.favorites = PanelState::Ready(FavoritesStore::new(items));
                }
                Err(reason) => app.state.ui.status = Some(Status::Error(reason)),
            },
            Event::ProfileLoaded { result, .. } => {
                app.state.data.profile = PanelState::from_outcome(result);
            }
            Event::LogsLoaded { result, .. } => {
                app.state.data.logs = PanelState::from_outcome(result);
            }
            Event::AccountUpdated { result, .. } => {
                if result.is_ok() {
                    Self::load_profile(app);
                }
            }
            Event::AccountDeleted { result, .. } => {
                if result.is_ok() {
                    Self::forget_account(app);
                }
            }
            Event::LoggedOut => Self::forget_account(app),
            Event::Search(keyword) => Self::search(app, keyword),
            Event::LoadCharts => Self::load_charts(app),
            Event::OpenChart(chart) => {
                let source = app.state.ui.source;
                let id = chart.id.clone();
                Self::request(
                    app,
                    keys::CHART_TRACKS,
                    move |api| async move {
                        api.catalog
                            .toplist(&id, source)
                            .await
                            .map_err(|e| e.user_message("Could not load the chart"))
                    },
                    move |id, result| Event::ChartTracksLoaded { id, chart, result },
                );
            }
            Event::CycleSource => {
                app.state.ui.source = app.state.ui.source.next();
                app.state.ui.status = Some(Status::Info(format!(
                    "Source: {}",
                    app.state.ui.source.label()
                )));
                Self::load_charts(app);
            }
            Event::Login { username, password } => Self::request(
                app,
                keys::AUTH,
                move |api| async move {
                    api.auth
                        .login(&username, &password)
                        .await
                        .map_err(|e| e.user_message("Login failed"))
                },
                |id, result| Event::AuthFinished { id, result },
            ),
            Event::Register { username, password } => Self::request(
                app,
                keys::AUTH,
                move |api| async move {
                    api.auth
                        .register(&username, &password)
                        .await
                        .map_err(|e| e.user_message("Registration failed"))
                },
                |id, result| Event::AuthFinished { id, result },
            ),
            Event::Logout => {
                let api = app.ctx.api.clone();
                let tx = app.ctx.event_tx.clone();
                app.task_manager.spawn(
                    "logout",
                    tokio::spawn(async move {
                        api.auth.logout().await;
                        let _ = tx.send(Event::LoggedOut);
                    }),
                );
            }
            Event::RefreshAccount => Self::refresh_account(app),
            Event::SaveProfile(profile) => Self::request(
                app,
                keys::ACCOUNT,
                move |api| async move {
                    api.auth
                        .update_profile(&profile)
                        .await
                        .map_err(|e| e.user_message("Could not save the profile"))
                },
                |id, result| Event::AccountUpdated { id, result },
            ),
            Event::ChangePassword(form) => Self::request(
                app,
                keys::ACCOUNT,
                move |api| async move {
                    api.auth
                        .change_password(&form)
                        .await
                        .map_err(|e| e.user_message("Could not change the password"))
                },
                |id, result| Event::AccountUpdated { id, result },
            ),
            Event::DeleteAccount(password) => Self::request(
                app,
                keys::ACCOUNT,
                move |api| async move {
                    api.auth
                        .delete_account(&password)
                        .await
                        .map_err(|e| e.user_message("Could not delete the account"))
                },
                |id, result| Event::AccountDeleted { id, result },
            ),
            Event::ToggleFavorite(track) => Self::toggle_favorite(app, track),
            Event::Status(message) => app.state.ui.status = Some(Status::Info(message)),
            Event::SearchLoaded { .. }
            | Event::ChartsLoaded { .. }
            | Event::ChartTracksLoaded { .. } => {}
        }
    }

    fn search(app: &mut App, keyword: String) {
        let source = app.state.ui.source;
        Self::request(
            app,
            keys::SEARCH,
            move |api| async move {
                api.catalog
                    .search(&keyword, source)
                    .await
                    .map_err(|e| e.user_message("Search failed"))
            },
            move |id, result| Event::SearchLoaded { id, source, result },
        );
    }

    fn load_charts(app: &mut App) {
        app.task_manager.abort(keys::CHART_TRACKS);
        let source = app.state.ui.source;
        Self::request(
            app,
            keys::CHARTS,
            move |api| async move {
                api.catalog
                    .toplists(source)
                    .await
                    .map_err(|e| e.user_message("Could not load charts"))
            },
            move |id, result| Event::ChartsLoaded { id, source, result },
        );
    }

    fn load_profile(app: &mut App) {
        Self::request(
            app,
            keys::PROFILE,
            |api| async move {
                api.auth
                    .profile()
                    .await
                    .map_err(|e| e.user_message("Could not load the profile"))
            },
            |id, result| Event::ProfileLoaded { id, result },
        );
    }

    /// Refetches favorites, profile and login logs of the signed-in user.
    fn refresh_account(app: &mut App) {
        let data = &mut app.state.data;
        if data.favorites.ready().is_none() {
            data.favorites = PanelState::Loading;
        }
        if data.profile.ready().is_none() {
            data.profile = PanelState::Loading;
        }
        if data.logs.ready().is_none() {
            data.logs = PanelState::Loading;
        }

        Self::request(
            app,
            keys::FAVORITES,
            |api| async move {
                api.favorites
                    .list()
                    .await
                    .map_err(|e| e.user_message("Could not load favorites"))
            },
            |id, result| Event::FavoritesLoaded { id, result },
        );
        Self::load_profile(app);
        Self::request(
            app,
            keys::LOGS,
            |api| async move {
                api.auth
                    .login_logs()
                    .await
                    .map_err(|e| e.user_message("Could not load sign-in history"))
            },
            |id, result| Event::LogsLoaded { id, result },
        );
    }

    fn forget_account(app: &mut App) {
        for key in [
            keys::FAVORITES,
            keys::FAVORITE_TOGGLE,
            keys::PROFILE,
            keys::LOGS,
            keys::ACCOUNT,
        ] {
            app.task_manager.abort(key);
        }
        app.state.data.clear_account();
    }

    fn toggle_favorite(app: &mut App, track: Track) {
        if app.state.data.user.is_none() {
            app.state.ui.status = Some(Status::Error("Please log in first".to_string()));
            return;
        }
        let present = app.state.data.is_favorite(&track);
        Self::request(
            app,
            keys::FAVORITE_TOGGLE,
            move |api| async move {
                api.favorites
                    .toggle(&track, present)
                    .await
                    .map_err(|e| e.user_message("Could not update favorites"))
            },
            |id, result| Event::FavoriteToggled { id, result },
        );
    }

    async fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }
        match evt.code {
            KeyCode::Char('c') if evt.modifiers == KeyModifiers::CONTROL => {
                app.update(AppMessage::Quit).await;
                return;
            }
            KeyCode::Tab => {
                app.update(AppMessage::NextTab).await;
                return;
            }
            KeyCode::BackTab => {
                app.update(AppMessage::PreviousTab).await;
                return;
            }
            _ => {}
        }

        let action = app.router.handle_input(evt, &app.state, &app.ctx).await;

        if let Some(action) = action {
            Self::dispatch_action(app, action).await;
            return;
        }

        if let Some(msg) = InputHandler::handle_key(evt) {
            app.update(msg).await;
        }
    }

    async fn dispatch_action(app: &mut App, action: Action) {
        match action {
            Action::Quit => app.should_quit = true,
            Action::PlayPause => app.update(AppMessage::TogglePlayPause).await,
            Action::NextTrack => app.update(AppMessage::NextTrack).await,
            Action::PreviousTrack => app.update(AppMessage::PreviousTrack).await,
            Action::PlayList(tracks, focus) => {
                app.ctx.audio_system.play_list(tracks, &focus).await;
            }
            Action::PlayIndex(index) => app.ctx.audio_system.play_track_at_index(index).await,
            Action::ToggleFavorite(track) => Self::toggle_favorite(app, track),
            Action::OpenLyrics => app.open_lyrics(),
            Action::CloseLyrics | Action::Back => app.router.clear_overlay(),
            Action::SwitchTab(index) => app.update(AppMessage::SetTab(index)).await,
            Action::None => {}
        }
    }

    async fn handle_mouse_event(app: &mut App, evt: MouseEvent) {
        match (evt.kind, evt.modifiers) {
            (MouseEventKind::ScrollUp, KeyModifiers::SHIFT) => {
                app.ctx.audio_system.seek_forwards().await
            }
            (MouseEventKind::ScrollUp, _) => app.ctx.audio_system.volume_up(),
            (MouseEventKind::ScrollDown, KeyModifiers::SHIFT) => {
                app.ctx.audio_system.seek_backwards().await
            }
            (MouseEventKind::ScrollDown, _) => app.ctx.audio_system.volume_down(),
            _ => {}
        }
    }
}
