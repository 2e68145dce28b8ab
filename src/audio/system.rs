use flume::Sender;
use std::{sync::Arc, time::Duration};
use tracing::info;

use crate::{
    audio::{
        config::AudioConfig,
        controller::{AudioCommand, AudioController},
        analyzer::{FrequencyAnalyzer, SampleWindow},
        playback::Output,
        progress::TrackProgress,
        queue::{PlayMode, QueueManager},
        state::PlaybackState,
        traits::AudioSource,
    },
    event::Event,
    model::Track,
};

/// The queue and the controller behind one set of player operations.
///
/// Built on an [`Output`] so it can be shared across tasks; the
/// [`PlaybackEngine`](crate::audio::playback::PlaybackEngine) that owns the
/// device stays with the caller.
pub struct AudioSystem {
    controller: AudioController,
    queue: QueueManager,
    config: AudioConfig,
}

impl AudioSystem {
    pub fn new(
        output: Output,
        event_tx: Sender<Event>,
        source: Arc<dyn AudioSource>,
        config: AudioConfig,
    ) -> Self {
        let controller = AudioController::new(output, source, event_tx, config.volume);

        Self {
            controller,
            queue: QueueManager::new(),
            config,
        }
    }

    /// Replaces the queue with `tracks` and starts `focus`.
    pub async fn play_list(&mut self, tracks: Vec<Track>, focus: &Track) {
        if self.queue.set_queue(tracks, focus).is_some() {
            self.play_current().await;
        } else {
            self.play_single_track(focus.clone()).await;
        }
    }

    pub async fn play_single_track(&mut self, track: Track) {
        self.queue.set_queue(vec![track.clone()], &track);
        self.play_current().await;
    }

    pub async fn play_track_at_index(&mut self, index: usize) {
        if self.queue.select(index).is_some() {
            self.play_current().await;
        }
    }

    /// Advances after a finished track. Returns `false` when the queue is
    /// exhausted and playback stays stopped.
    pub async fn on_track_ended(&mut self) -> bool {
        if self.queue.next().is_some() {
            self.play_current().await;
            true
        } else {
            info!("Reached the end of the queue");
            false
        }
    }

    /// Skips ahead. With nothing left to play the current track is stopped
    /// and `false` is returned.
    pub async fn play_next(&mut self) -> bool {
        if self.queue.next().is_some() {
            self.play_current().await;
            true
        } else {
            self.stop().await;
            false
        }
    }

    pub async fn play_previous(&mut self) {
        if self.queue.previous().is_some() {
            self.play_current().await;
        }
    }

    async fn play_current(&mut self) {
        if let Some(track) = self.queue.current_track().cloned() {
            self.controller
                .handle_command(AudioCommand::PlayTrack(track))
                .await;
        }
    }

    pub async fn play_pause(&mut self) {
        match self.controller.state() {
            PlaybackState::Playing(_) => self.controller.handle_command(AudioCommand::Pause).await,
            PlaybackState::Paused(_) => self.controller.handle_command(AudioCommand::Resume).await,
            PlaybackState::Stopped | PlaybackState::Error(_) => self.play_current().await,
            PlaybackState::Buffering(_) => {}
        }
    }

    pub async fn stop(&mut self) {
        self.controller.handle_command(AudioCommand::Stop).await;
    }

    pub fn volume_up(&mut self) {
        self.controller.volume_up(self.config.volume_step);
    }

    pub fn volume_down(&mut self) {
        self.controller.volume_down(self.config.volume_step);
    }

    pub fn toggle_mute(&mut self) {
        self.controller.toggle_mute();
    }

    pub async fn seek_backwards(&mut self) {
        let (current_ms, _) = self.controller.track_progress.get_progress();
        let delta_ms = self.config.seek_step.as_millis() as u64;
        let new_pos_ms = current_ms.saturating_sub(delta_ms);
        self.controller
            .handle_command(AudioCommand::Seek(Duration::from_millis(new_pos_ms)))
            .await;
    }

    pub async fn seek_forwards(&mut self) {
        let (current_ms, total_ms) = self.controller.track_progress.get_progress();
        let delta_ms = self.config.seek_step.as_millis() as u64;
        let mut new_pos_ms = current_ms.saturating_add(delta_ms);
        if total_ms > 0 {
            new_pos_ms = new_pos_ms.min(total_ms);
        }
        self.controller
            .handle_command(AudioCommand::Seek(Duration::from_millis(new_pos_ms)))
            .await;
    }

    pub fn cycle_mode(&mut self) -> PlayMode {
        self.queue.cycle_mode()
    }

    pub fn mode(&self) -> PlayMode {
        self.queue.mode()
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn current_track(&self) -> Option<Track> {
        self.controller.current_track()
    }

    pub fn is_playing(&self) -> bool {
        self.controller.is_playing()
    }

    pub fn volume(&self) -> u8 {
        self.controller.volume()
    }

    pub fn is_muted(&self) -> bool {
        self.controller.is_muted()
    }

    pub fn track_progress(&self) -> &Arc<TrackProgress> {
        &self.controller.track_progress
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current()
    }

    pub fn sample_window(&self) -> SampleWindow {
        self.controller.sample_window()
    }

    pub fn analyzer(&self) -> FrequencyAnalyzer {
        FrequencyAnalyzer::new(self.sample_window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::error::AudioError, model::Source};
    use async_trait::async_trait;

    /// A short mono 16-bit PCM WAV of silence.
    fn wav() -> Vec<u8> {
        let samples = 8000u32;
        let data_len = samples * 2;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);
        bytes
    }

    struct Silence;

    #[async_trait]
    impl AudioSource for Silence {
        async fn fetch_audio(&self, _track: &Track) -> Result<Vec<u8>, AudioError> {
            Ok(wav())
        }
    }

    fn tracks(n: usize) -> Vec<Track> {
        (0..n)
            .map(|i| Track {
                id: i.to_string(),
                name: format!("Track {i}"),
                artist: "Artist".into(),
                source: Source::Netease,
            })
            .collect()
    }

    async fn wait_for_start(rx: &flume::Receiver<Event>) -> Track {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv_async())
                .await
                .expect("track never started")
                .expect("channel closed");
            match event {
                Event::TrackStarted(track, _) => return track,
                Event::PlaybackFailed(_, reason) => panic!("playback failed: {reason}"),
                _ => {}
            }
        }
    }

    #[tokio::test]
    async fn next_at_the_end_of_an_ordered_queue_stops_playback() {
        let (output, _mixer) = Output::detached();
        let (tx, rx) = flume::unbounded();
        let mut system = AudioSystem::new(output, tx, Arc::new(Silence), AudioConfig::default());

        let list = tracks(2);
        system.play_list(list.clone(), &list[1]).await;
        assert_eq!(wait_for_start(&rx).await.id, "1");
        assert!(system.is_playing());
        assert_eq!(system.mode(), PlayMode::Order);

        assert!(!system.play_next().await);
        assert!(!system.is_playing());
        assert_eq!(system.state(), PlaybackState::Stopped);
        assert_eq!(system.current_index(), Some(1));
    }

    #[tokio::test]
    async fn next_moves_on_while_tracks_remain() {
        let (output, _mixer) = Output::detached();
        let (tx, rx) = flume::unbounded();
        let mut system = AudioSystem::new(output, tx, Arc::new(Silence), AudioConfig::default());

        let list = tracks(2);
        system.play_list(list.clone(), &list[0]).await;
        assert_eq!(wait_for_start(&rx).await.id, "0");

        assert!(system.play_next().await);
        assert_eq!(wait_for_start(&rx).await.id, "1");
        assert_eq!(system.current_index(), Some(1));
        assert!(system.is_playing());
    }
}
