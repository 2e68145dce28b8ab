use std::{
    sync::{Arc, RwLock},
    time::Duration,
};

use rodio::{DeviceSinkBuilder, MixerDeviceSink, Player, Source, mixer::Mixer};

use crate::audio::error::AudioError;

/// Owns the device sink. The sink stays with the owner; everything that
/// runs elsewhere talks to it through an [`Output`].
pub struct PlaybackEngine {
    _device: MixerDeviceSink,
    output: Output,
}

impl PlaybackEngine {
    pub fn new() -> Result<Self, AudioError> {
        let mut device = DeviceSinkBuilder::from_default_device()
            .map_err(|e| AudioError::Device(e.to_string()))?
            .with_error_callback(|_| {})
            .open_sink_or_fallback()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        device.log_on_drop(false);

        let mixer = device.mixer().clone();

        Ok(Self {
            _device: device,
            output: Output::on_mixer(mixer),
        })
    }

    pub fn output(&self) -> Output {
        self.output.clone()
    }
}

/// Cloneable handle on the current player. Each track gets a fresh player;
/// the previous one is stopped when replaced.
#[derive(Clone)]
pub struct Output {
    mixer: Mixer,
    player: Arc<RwLock<Player>>,
}

impl Output {
    fn on_mixer(mixer: Mixer) -> Self {
        let player = Player::connect_new(&mixer);
        Self {
            mixer,
            player: Arc::new(RwLock::new(player)),
        }
    }

    /// An output whose mixer is not attached to any device. Nothing is ever
    /// pulled from it, so appended sources stay queued.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, rodio::mixer::MixerSource) {
        use rodio::math::nz;

        let (mixer, source) = rodio::mixer::mixer(nz!(2), nz!(44100));
        (Self::on_mixer(mixer), source)
    }

    pub fn play_source<S>(&self, source: S, volume: f32)
    where
        S: Source + Send + 'static,
    {
        let player = Player::connect_new(&self.mixer);
        player.set_volume(volume);
        player.append(source);

        let old = {
            let mut guard = self.player.write().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *guard, player)
        };
        old.stop();
    }

    fn with_player<R>(&self, f: impl FnOnce(&Player) -> R) -> R {
        let guard = self.player.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    pub fn set_volume(&self, volume: f32) {
        self.with_player(|p| p.set_volume(volume));
    }

    pub fn pause(&self) {
        self.with_player(|p| p.pause());
    }

    pub fn play(&self) {
        self.with_player(|p| p.play());
    }

    pub fn stop(&self) {
        self.with_player(|p| p.stop());
    }

    pub fn is_empty(&self) -> bool {
        self.with_player(|p| p.empty())
    }

    pub fn get_pos(&self) -> Duration {
        self.with_player(|p| p.get_pos())
    }

    pub fn try_seek(&self, pos: Duration) -> Result<(), rodio::source::SeekError> {
        self.with_player(|p| p.try_seek(pos))
    }
}
