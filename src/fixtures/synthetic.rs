//! Deterministic signal generators for tests and the CLI harness.
//!
//! Tonal patterns use a phase accumulator so sweeps and vibrato have the
//! requested instantaneous frequency. Noise is drawn from a fixed-seed
//! `StdRng`, so every render of the same spec is identical.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

const NOISE_SEED: u64 = 0x5A5A_FFF0;

/// Supported deterministic waveform patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntheticPattern {
    /// All-zero PCM
    Silence,
    /// Constant-frequency sine
    Sine,
    /// Linear frequency sweep from `frequency_hz` to `end_frequency_hz`
    Sweep,
    /// Sine whose frequency oscillates around `frequency_hz`
    Vibrato,
    /// Uniform white noise
    WhiteNoise,
}

/// Configuration for a synthetic recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticSpec {
    pub pattern: SyntheticPattern,
    #[serde(default = "default_frequency_hz")]
    pub frequency_hz: f32,
    #[serde(default = "default_end_frequency_hz")]
    pub end_frequency_hz: f32,
    /// Peak amplitude in [0, 1]
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_seconds")]
    pub seconds: f32,
}

fn default_frequency_hz() -> f32 {
    220.0
}

fn default_end_frequency_hz() -> f32 {
    440.0
}

fn default_amplitude() -> f32 {
    // RMS of ~0.3 for sinusoids
    0.3 * std::f32::consts::SQRT_2
}

fn default_seconds() -> f32 {
    30.0
}

/// Vibrato rate in Hz
pub const VIBRATO_RATE_HZ: f32 = 5.5;
/// Vibrato depth as a fraction of the centre frequency
pub const VIBRATO_DEPTH: f32 = 0.03;

impl SyntheticSpec {
    pub fn new(pattern: SyntheticPattern, seconds: f32) -> Self {
        Self {
            pattern,
            frequency_hz: default_frequency_hz(),
            end_frequency_hz: default_end_frequency_hz(),
            amplitude: default_amplitude(),
            seconds,
        }
    }

    /// Render the pattern at `sample_rate`
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let len = (self.seconds.max(0.0) * sample_rate as f32).round() as usize;
        match self.pattern {
            SyntheticPattern::Silence => silence(len),
            SyntheticPattern::Sine => sine(sample_rate, self.frequency_hz, self.amplitude, len),
            SyntheticPattern::Sweep => sweep(
                sample_rate,
                self.frequency_hz,
                self.end_frequency_hz,
                self.amplitude,
                len,
            ),
            SyntheticPattern::Vibrato => vibrato(
                sample_rate,
                self.frequency_hz,
                VIBRATO_DEPTH,
                VIBRATO_RATE_HZ,
                self.amplitude,
                len,
            ),
            SyntheticPattern::WhiteNoise => white_noise(self.amplitude, len, NOISE_SEED),
        }
    }
}

pub fn silence(len: usize) -> Vec<f32> {
    vec![0.0; len]
}

pub fn sine(sample_rate: u32, frequency: f32, amplitude: f32, len: usize) -> Vec<f32> {
    oscillator(sample_rate, len, amplitude, |_| frequency)
}

/// Linear sweep from `start_hz` to `end_hz` over `len` samples
pub fn sweep(sample_rate: u32, start_hz: f32, end_hz: f32, amplitude: f32, len: usize) -> Vec<f32> {
    let span = len.max(1) as f32;
    oscillator(sample_rate, len, amplitude, |i| {
        start_hz + (end_hz - start_hz) * (i as f32 / span)
    })
}

/// Sine modulated by `depth * centre_hz` at `rate_hz`
pub fn vibrato(
    sample_rate: u32,
    centre_hz: f32,
    depth: f32,
    rate_hz: f32,
    amplitude: f32,
    len: usize,
) -> Vec<f32> {
    let sr = sample_rate as f32;
    oscillator(sample_rate, len, amplitude, |i| {
        centre_hz * (1.0 + depth * (2.0 * PI * rate_hz * i as f32 / sr).sin())
    })
}

/// Seeded uniform white noise in `[-amplitude, amplitude)`
pub fn white_noise(amplitude: f32, len: usize, seed: u64) -> Vec<f32> {
    if amplitude <= 0.0 {
        return silence(len);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-amplitude..amplitude)).collect()
}

fn oscillator<F>(sample_rate: u32, len: usize, amplitude: f32, frequency_at: F) -> Vec<f32>
where
    F: Fn(usize) -> f32,
{
    let sr = sample_rate.max(1) as f32;
    let mut phase = 0.0f32;
    (0..len)
        .map(|i| {
            let value = (2.0 * PI * phase).sin() * amplitude;
            phase += frequency_at(i) / sr;
            if phase >= 1.0 {
                phase -= phase.floor();
            }
            value
        })
        .collect()
}
