/// Global commands bound to keys no view claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMessage {
    Quit,
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBackward,
    CycleMode,
    ToggleMute,
    ToggleFavorite,
    ToggleLyrics,
    GoBack,
    NextTab,
    PreviousTab,
    SetTab(usize),
}
