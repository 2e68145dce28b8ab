use std::{
    collections::VecDeque,
    f32::consts::PI,
    sync::{Arc, Mutex},
    time::Duration,
};

use rodio::{ChannelCount, Sample, SampleRate, Source, source::SeekError};
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::visualizer::FrequencySource;

pub const FFT_SIZE: usize = 256;
pub const BIN_COUNT: usize = FFT_SIZE / 2;
pub const SMOOTHING: f32 = 0.8;
pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;

/// Latest mono samples, newest at the back.
pub type SampleWindow = Arc<Mutex<VecDeque<f32>>>;

pub fn sample_window() -> SampleWindow {
    Arc::new(Mutex::new(VecDeque::with_capacity(FFT_SIZE)))
}

/// Wraps a decoded source and publishes each interleaved frame, mixed to
/// mono, for the analyser. Samples pass through unchanged. Runs on the audio
/// thread, so it never waits for the lock: a frame is dropped when the UI
/// holds it.
pub struct FrequencyTap<S> {
    inner: S,
    window: SampleWindow,
    frame_sum: f32,
    frame_len: usize,
}

impl<S: Source> FrequencyTap<S> {
    pub fn new(inner: S, window: SampleWindow) -> Self {
        Self {
            inner,
            window,
            frame_sum: 0.0,
            frame_len: 0,
        }
    }

    fn publish(&mut self, sample: f32) {
        let channels = usize::from(self.inner.channels().get());
        self.frame_sum += sample;
        self.frame_len += 1;

        if self.frame_len >= channels {
            let mono = self.frame_sum / channels as f32;
            self.frame_sum = 0.0;
            self.frame_len = 0;

            if let Ok(mut window) = self.window.try_lock() {
                if window.len() >= FFT_SIZE {
                    window.pop_front();
                }
                window.push_back(mono);
            }
        }
    }
}

impl<S: Source> Iterator for FrequencyTap<S> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        let sample = self.inner.next()?;
        self.publish(sample);
        Some(sample)
    }
}

impl<S: Source> Source for FrequencyTap<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> ChannelCount {
        self.inner.channels()
    }

    fn sample_rate(&self) -> SampleRate {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> Result<(), SeekError> {
        self.frame_sum = 0.0;
        self.frame_len = 0;
        self.inner.try_seek(pos)
    }
}

/// Byte spectrum of the tapped samples: Blackman window, FFT of 256, time
/// smoothing of 0.8 and decibels in [-100, -30] mapped onto 0..=255.
pub struct FrequencyAnalyzer {
    window: SampleWindow,
    fft: Arc<dyn Fft<f32>>,
    blackman: Vec<f32>,
    input: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl FrequencyAnalyzer {
    pub fn new(window: SampleWindow) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        let blackman = (0..FFT_SIZE)
            .map(|i| {
                let x = i as f32 / FFT_SIZE as f32;
                0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
            })
            .collect();

        Self {
            window,
            fft,
            blackman,
            input: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            smoothed: vec![0.0; BIN_COUNT],
            bytes: vec![0; BIN_COUNT],
        }
    }

    pub fn analyze(&mut self) -> &[u8] {
        let samples: Vec<f32> = match self.window.lock() {
            Ok(window) => window.iter().copied().collect(),
            Err(poisoned) => poisoned.into_inner().iter().copied().collect(),
        };

        let offset = FFT_SIZE - samples.len().min(FFT_SIZE);
        for (i, slot) in self.input.iter_mut().enumerate() {
            let sample = if i >= offset {
                samples[samples.len() - (FFT_SIZE - i)]
            } else {
                0.0
            };
            *slot = Complex::new(sample * self.blackman[i], 0.0);
        }

        self.fft.process(&mut self.input);

        let scale = 255.0 / (MAX_DECIBELS - MIN_DECIBELS);
        for k in 0..BIN_COUNT {
            let magnitude = self.input[k].norm() / FFT_SIZE as f32;
            self.smoothed[k] = SMOOTHING * self.smoothed[k] + (1.0 - SMOOTHING) * magnitude;

            let db = if self.smoothed[k] > 0.0 {
                20.0 * self.smoothed[k].log10()
            } else {
                f32::NEG_INFINITY
            };
            self.bytes[k] = (scale * (db - MIN_DECIBELS)).clamp(0.0, 255.0) as u8;
        }

        &self.bytes
    }
}

impl FrequencySource for FrequencyAnalyzer {
    fn byte_frequency_data(&mut self) -> &[u8] {
        self.analyze()
    }
}
