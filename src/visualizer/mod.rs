//! Frequency bars shared by every spectrum surface.
//!
//! One frame is computed per tick from a byte frequency buffer and then
//! painted unchanged onto each mounted surface, so the player bar and the
//! lyrics view always show the same picture.

pub const BAND_COUNT: usize = 36;
/// Height, in abstract units, the bar geometry is computed against.
/// Surfaces scale it to their own size.
pub const REFERENCE_HEIGHT: f32 = 40.0;
pub const MIN_BAR_HEIGHT: f32 = 6.0;
pub const PEAK_DECAY: f32 = 1.4;

const EASING: f32 = 1.1;
const HEIGHT_GAIN: f32 = 1.2;

/// Anything that can hand out a byte frequency buffer (0 = silent bin).
pub trait FrequencySource {
    fn byte_frequency_data(&mut self) -> &[u8];
}

/// A drawing target for one frame of bars.
pub trait Surface {
    fn paint(&mut self, bars: &[Bar], reference_height: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Eased energy in `[0, 1]`.
    pub energy: f32,
    pub height: f32,
    pub peak: f32,
    pub hue: f32,
    pub alpha: f32,
}

impl Bar {
    pub const fn silent() -> Self {
        Self {
            energy: 0.0,
            height: MIN_BAR_HEIGHT,
            peak: 0.0,
            hue: 200.0,
            alpha: 0.45,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Visualizer {
    running: bool,
    bars: Vec<Bar>,
    peaks: Vec<f32>,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            running: false,
            bars: vec![Bar::silent(); BAND_COUNT],
            peaks: vec![0.0; BAND_COUNT],
        }
    }

    /// Returns `true` when this call changed the state.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Advances one frame. Does nothing while stopped or without a source.
    pub fn on_frame(&mut self, source: Option<&mut dyn FrequencySource>) -> bool {
        if !self.running {
            return false;
        }
        let Some(source) = source else {
            return false;
        };

        let data = source.byte_frequency_data();
        let band_size = data.len() / BAND_COUNT;
        if band_size == 0 {
            return false;
        }

        for (i, bar) in self.bars.iter_mut().enumerate() {
            let band = &data[i * band_size..(i + 1) * band_size];
            let sum: u32 = band.iter().map(|b| *b as u32).sum();
            let average = sum as f32 / band_size as f32;

            let energy = (average / 255.0).min(1.0);
            let eased = energy.powf(EASING);
            let height = (eased * REFERENCE_HEIGHT * HEIGHT_GAIN).max(MIN_BAR_HEIGHT);
            let peak = height.max(self.peaks[i] - PEAK_DECAY);
            self.peaks[i] = peak;

            *bar = Bar {
                energy: eased,
                height,
                peak,
                hue: 200.0 + eased * 80.0,
                alpha: 0.45 + eased * 0.5,
            };
        }
        true
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        surface.paint(&self.bars, REFERENCE_HEIGHT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<u8>);

    impl FrequencySource for Fixed {
        fn byte_frequency_data(&mut self) -> &[u8] {
            &self.0
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<Vec<Bar>>);

    impl Surface for Recorder {
        fn paint(&mut self, bars: &[Bar], _reference_height: f32) {
            self.0.push(bars.to_vec());
        }
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut vis = Visualizer::new();
        assert!(vis.start());
        assert!(!vis.start());
        assert!(vis.stop());
        assert!(!vis.stop());
    }

    #[test]
    fn stopped_or_missing_tap_draws_nothing() {
        let mut vis = Visualizer::new();
        let mut source = Fixed(vec![255; 128]);
        assert!(!vis.on_frame(Some(&mut source)));

        vis.start();
        assert!(!vis.on_frame(None));
        assert_eq!(vis.bars()[0], Bar::silent());
    }

    #[test]
    fn full_scale_bars_and_peak_decay() {
        let mut vis = Visualizer::new();
        vis.start();

        let mut loud = Fixed(vec![255; 128]);
        assert!(vis.on_frame(Some(&mut loud)));
        let bar = vis.bars()[0];
        assert_eq!(bar.height, REFERENCE_HEIGHT * 1.2);
        assert_eq!(bar.hue, 280.0);
        assert!((bar.alpha - 0.95).abs() < 1e-6);

        let mut quiet = Fixed(vec![0; 128]);
        vis.on_frame(Some(&mut quiet));
        let bar = vis.bars()[0];
        assert_eq!(bar.height, MIN_BAR_HEIGHT);
        assert!((bar.peak - (REFERENCE_HEIGHT * 1.2 - PEAK_DECAY)).abs() < 1e-4);

        for _ in 0..100 {
            vis.on_frame(Some(&mut quiet));
        }
        assert_eq!(vis.bars()[0].peak, MIN_BAR_HEIGHT);
    }

    #[test]
    fn bands_average_their_bins() {
        let mut data = vec![0u8; 128];
        // band 1 covers bins 3..6
        data[3] = 255;
        data[4] = 255;
        data[5] = 255;
        data[127] = 255;

        let mut vis = Visualizer::new();
        vis.start();
        vis.on_frame(Some(&mut Fixed(data)));
        assert_eq!(vis.bars()[1].energy, 1.0);
        assert_eq!(vis.bars()[0].energy, 0.0);
        assert_eq!(vis.bars()[BAND_COUNT - 1].energy, 0.0);
    }

    #[test]
    fn every_surface_gets_the_same_frame() {
        let mut vis = Visualizer::new();
        vis.start();
        vis.on_frame(Some(&mut Fixed((0..128).map(|i| (i * 2) as u8).collect())));

        let mut player = Recorder::default();
        let mut lyrics = Recorder::default();
        vis.paint(&mut player);
        vis.paint(&mut lyrics);
        assert_eq!(player.0, lyrics.0);
        assert_eq!(player.0[0].len(), BAND_COUNT);
    }
}
