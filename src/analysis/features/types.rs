// Types module - Data structures for per-frame audio features
//
// This module defines the core data structures produced by the feature
// extraction stage and consumed by the gates and metric evaluators.

use serde::{Deserialize, Serialize};

/// Frequency-domain view of one analysis frame
///
/// All three arrays have length `fft_size / 2` (positive frequencies only)
/// and `frequencies[i] == i * sample_rate / fft_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumResult {
    /// Bin magnitudes `sqrt(re² + im²)`
    pub magnitude: Vec<f32>,
    /// Bin phases `atan2(im, re)` in radians
    pub phase: Vec<f32>,
    /// Centre frequency of each bin in Hz
    pub frequencies: Vec<f32>,
    /// Transform length after zero-padding/truncation
    pub fft_size: usize,
    /// Sample rate the frame was captured at
    pub sample_rate: u32,
}

impl SpectrumResult {
    /// Width of one frequency bin in Hz
    pub fn bin_width(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Squared magnitudes, the representation used by pitch and timbre analysis
    pub fn power_spectrum(&self) -> PowerSpectrum {
        PowerSpectrum {
            power: self.magnitude.iter().map(|m| m * m).collect(),
            bin_width: self.bin_width(),
        }
    }
}

/// Power spectrum of one frame (`magnitude²` per bin)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PowerSpectrum {
    pub power: Vec<f32>,
    /// Width of one bin in Hz (`sample_rate / fft_size`)
    pub bin_width: f32,
}

impl PowerSpectrum {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Centre frequency of bin `index` in Hz
    pub fn frequency(&self, index: usize) -> f32 {
        index as f32 * self.bin_width
    }

    /// Nearest bin for a frequency, or `None` when it lies past the last bin
    pub fn bin_for(&self, frequency: f32) -> Option<usize> {
        if self.bin_width <= 0.0 {
            return None;
        }
        let index = (frequency / self.bin_width).round();
        if index < 0.0 {
            return None;
        }
        let index = index as usize;
        (index < self.power.len()).then_some(index)
    }

    /// First bin holding the maximum power, with that power
    pub fn peak(&self) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &p) in self.power.iter().enumerate() {
            match best {
                Some((_, max)) if p <= max => {}
                _ => best = Some((i, p)),
            }
        }
        best
    }
}

/// Fundamental-frequency estimate for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitchEstimate {
    /// Candidate fundamental in Hz (0.0 when the vocal band holds no power)
    pub frequency: f32,
    /// Number of harmonics (2x..5x) above 30% of the fundamental's power
    ///
    /// Informational only: the frequency is reported regardless of this count.
    pub harmonic_evidence: u8,
}

impl PitchEstimate {
    /// No pitch detected
    pub const NONE: PitchEstimate = PitchEstimate {
        frequency: 0.0,
        harmonic_evidence: 0,
    };

    pub fn is_pitched(&self) -> bool {
        self.frequency > 0.0
    }
}

/// Features extracted from a single analysis frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFeatures {
    /// Root-mean-square level (0.0 to 1.0), the volume proxy
    pub rms: f32,

    /// Zero-crossing rate (0.0 to 1.0), the timbre/brightness proxy
    pub zcr: f32,

    /// Fundamental estimate restricted to the vocal band
    pub pitch: PitchEstimate,

    /// Power spectrum of the frame
    pub spectrum: PowerSpectrum,
}
