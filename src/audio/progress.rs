use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default, Debug)]
pub struct TrackProgress {
    current_position_millis: AtomicU64,
    total_duration_millis: AtomicU64,
    generation: AtomicU64,
}

impl TrackProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_position(&self, position: Duration) {
        self.current_position_millis
            .store(position.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn set_total_duration(&self, duration: Duration) {
        self.total_duration_millis
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn get_progress(&self) -> (u64, u64) {
        (
            self.current_position_millis.load(Ordering::Relaxed),
            self.total_duration_millis.load(Ordering::Relaxed),
        )
    }

    pub fn position_secs(&self) -> f64 {
        self.current_position_millis.load(Ordering::Relaxed) as f64 / 1000.0
    }

    /// Played share of the track, 0 when the length is unknown.
    pub fn ratio(&self) -> f64 {
        let (position, total) = self.get_progress();
        if total == 0 {
            0.0
        } else {
            (position as f64 / total as f64).clamp(0.0, 1.0)
        }
    }

    pub fn get_generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.set_current_position(Duration::ZERO);
        self.set_total_duration(Duration::ZERO);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_is_clamped_and_reset_bumps_generation() {
        let progress = TrackProgress::new();
        assert_eq!(progress.ratio(), 0.0);

        progress.set_total_duration(Duration::from_secs(200));
        progress.set_current_position(Duration::from_secs(50));
        assert_eq!(progress.ratio(), 0.25);
        assert_eq!(progress.position_secs(), 50.0);

        progress.set_current_position(Duration::from_secs(500));
        assert_eq!(progress.ratio(), 1.0);

        progress.reset();
        assert_eq!(progress.get_progress(), (0, 0));
        assert_eq!(progress.get_generation(), 1);
    }
}
