use flume::Sender;
use rodio::{Decoder, Source};
use std::{
    io::Cursor,
    sync::{
        Arc, RwLock,
        atomic::{AtomicBool, AtomicU8, Ordering},
    },
    time::Duration,
};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::audio::{
    analyzer::{FrequencyTap, SampleWindow, sample_window},
    error::AudioError,
    playback::Output,
    progress::TrackProgress,
    state::PlaybackState,
    traits::AudioSource,
};
use crate::event::Event;
use crate::model::Track;

const MONITOR_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub enum AudioCommand {
    PlayTrack(Track),
    Pause,
    Resume,
    Stop,
    Seek(Duration),
}

pub struct AudioController {
    output: Output,
    source: Arc<dyn AudioSource>,
    state: Arc<RwLock<PlaybackState>>,
    event_tx: Sender<Event>,
    pub track_progress: Arc<TrackProgress>,
    current_playback_task: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
    sample_window: SampleWindow,
    volume: Arc<AtomicU8>,
    is_muted: Arc<AtomicBool>,
}

impl AudioController {
    pub fn new(
        output: Output,
        source: Arc<dyn AudioSource>,
        event_tx: Sender<Event>,
        volume: u8,
    ) -> Self {
        let controller = Self {
            output,
            source,
            state: Arc::new(RwLock::new(PlaybackState::Stopped)),
            event_tx,
            track_progress: Arc::new(TrackProgress::new()),
            current_playback_task: Arc::new(Mutex::new(None)),
            sample_window: sample_window(),
            volume: Arc::new(AtomicU8::new(volume.min(100))),
            is_muted: Arc::new(AtomicBool::new(false)),
        };

        controller.start_monitor();
        controller
    }

    /// Publishes the position every 100 ms and reports the end of a track.
    fn start_monitor(&self) {
        let output = self.output.clone();
        let progress = self.track_progress.clone();
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            loop {
                tokio::time::sleep(MONITOR_INTERVAL).await;

                let is_playing = {
                    let state_guard = state.read().unwrap_or_else(|e| e.into_inner());
                    matches!(*state_guard, PlaybackState::Playing(_))
                };

                if is_playing {
                    progress.set_current_position(output.get_pos());

                    if output.is_empty() {
                        {
                            let mut state_guard = state.write().unwrap_or_else(|e| e.into_inner());
                            *state_guard = PlaybackState::Stopped;
                        }
                        debug!("Track finished");
                        if event_tx.send(Event::TrackEnded).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    }

    pub async fn handle_command(&self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::PlayTrack(track) => self.play_track(track).await,
            AudioCommand::Pause => self.pause(),
            AudioCommand::Resume => self.resume(),
            AudioCommand::Stop => self.stop().await,
            AudioCommand::Seek(pos) => self.seek(pos),
        }
    }

    async fn play_track(&self, track: Track) {
        self.stop().await;
        self.set_state(PlaybackState::Buffering(track.clone()));
        info!("Loading {} - {}", track.display_artist(), track.name);

        let output = self.output.clone();
        let source = self.source.clone();
        let progress = self.track_progress.clone();
        let event_tx = self.event_tx.clone();
        let state = self.state.clone();
        let window = self.sample_window.clone();
        let volume = self.effective_volume();
        let generation = progress.get_generation();

        let task = tokio::spawn(async move {
            let result = async {
                let bytes = source.fetch_audio(&track).await?;
                tokio::task::spawn_blocking(move || decode(bytes))
                    .await
                    .map_err(|e| AudioError::Decode(e.to_string()))?
            }
            .await;

            if progress.get_generation() != generation {
                return;
            }

            match result {
                Ok(decoded) => {
                    let duration = decoded.total_duration().unwrap_or_default();
                    progress.set_total_duration(duration);

                    if let Ok(mut samples) = window.lock() {
                        samples.clear();
                    }
                    output.play_source(FrequencyTap::new(decoded, window), volume);
                    {
                        let mut state_guard = state.write().unwrap_or_else(|e| e.into_inner());
                        *state_guard = PlaybackState::Playing(track.clone());
                    }
                    let _ = event_tx.send(Event::TrackStarted(track, duration));
                }
                Err(e) => {
                    error!("Playback of {} failed: {e}", track.id);
                    {
                        let mut state_guard = state.write().unwrap_or_else(|e| e.into_inner());
                        *state_guard = PlaybackState::Error(e.to_string());
                    }
                    let _ = event_tx.send(Event::PlaybackFailed(track, e.to_string()));
                }
            }
        });

        let mut task_guard = self.current_playback_task.lock().await;
        *task_guard = Some(task);
    }

    async fn stop(&self) {
        let mut task_guard = self.current_playback_task.lock().await;
        if let Some(task) = task_guard.take() {
            task.abort();
        }
        self.output.stop();
        self.track_progress.reset();
        self.set_state(PlaybackState::Stopped);
    }

    fn pause(&self) {
        self.output.pause();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let PlaybackState::Playing(track) = &*state {
            *state = PlaybackState::Paused(track.clone());
        }
    }

    fn resume(&self) {
        self.output.play();
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let PlaybackState::Paused(track) = &*state {
            *state = PlaybackState::Playing(track.clone());
        }
    }

    fn seek(&self, pos: Duration) {
        if let Err(e) = self.output.try_seek(pos) {
            debug!("Seek failed: {e}");
            return;
        }
        self.track_progress.set_current_position(pos);
    }

    fn set_state(&self, next: PlaybackState) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = next;
    }

    pub fn state(&self) -> PlaybackState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_playing(&self) -> bool {
        self.state().is_playing()
    }

    pub fn current_track(&self) -> Option<Track> {
        self.state().track().cloned()
    }

    pub fn sample_window(&self) -> SampleWindow {
        self.sample_window.clone()
    }

    pub fn volume(&self) -> u8 {
        self.volume.load(Ordering::Relaxed)
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted.load(Ordering::Relaxed)
    }

    pub fn set_volume_u8(&self, volume: u8) {
        self.volume.store(volume.min(100), Ordering::Relaxed);
        self.is_muted.store(false, Ordering::Relaxed);
        self.apply_volume();
    }

    pub fn volume_up(&self, amount: u8) {
        let current = self.volume.load(Ordering::Relaxed);
        self.set_volume_u8(current.saturating_add(amount));
    }

    pub fn volume_down(&self, amount: u8) {
        let current = self.volume.load(Ordering::Relaxed);
        self.set_volume_u8(current.saturating_sub(amount));
    }

    pub fn toggle_mute(&self) {
        let muted = self.is_muted.load(Ordering::Relaxed);
        self.is_muted.store(!muted, Ordering::Relaxed);
        self.apply_volume();
    }

    fn effective_volume(&self) -> f32 {
        if self.is_muted.load(Ordering::Relaxed) {
            0.0
        } else {
            self.volume.load(Ordering::Relaxed) as f32 / 100.0
        }
    }

    fn apply_volume(&self) {
        self.output.set_volume(self.effective_volume());
    }
}

fn decode(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, AudioError> {
    let len = bytes.len() as u64;
    Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(len)
        .with_seekable(true)
        .build()
        .map_err(|e| AudioError::Decode(e.to_string()))
}
