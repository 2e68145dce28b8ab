use crate::model::Track;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    Stopped,
    /// Downloading and decoding.
    Buffering(Track),
    Playing(Track),
    Paused(Track),
    Error(String),
}

impl PlaybackState {
    /// The track the player is busy with, if any.
    pub fn track(&self) -> Option<&Track> {
        match self {
            PlaybackState::Buffering(t) | PlaybackState::Playing(t) | PlaybackState::Paused(t) => {
                Some(t)
            }
            PlaybackState::Stopped | PlaybackState::Error(_) => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing(_))
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "",
            PlaybackState::Buffering(_) => "󰔟",
            PlaybackState::Playing(_) => "",
            PlaybackState::Paused(_) => "",
            PlaybackState::Error(_) => "",
        }
    }
}
