pub mod handler;

use std::time::{SystemTime, UNIX_EPOCH};

pub fn get_active_track_icon(is_playing: bool) -> &'static str {
    if is_playing {
        const FRAME_STEP_MS: u128 = 100;

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        match (now / FRAME_STEP_MS) % 6 {
            1 | 4 => "•",
            2 | 3 => "●",
            _ => "·",
        }
    } else {
        "•"
    }
}
