// FeatureExtractor - per-frame DSP feature extraction for vocal scoring
//
// The recording is cut into ~0.1 s analysis frames. Each frame yields an
// RMS level, a zero-crossing rate, a power spectrum and a pitch estimate.
// Frames are independent, so extraction may run on a rayon pool; the
// collected features keep frame order before they are folded into the
// histories read by the gates and evaluators.
//
// Module organization:
// - types: Data structures (SpectrumResult, PowerSpectrum, PitchEstimate, FrameFeatures)
// - fft: Spectrum computation (rectangular window, capped transform size)
// - temporal: Time-domain features (RMS, ZCR)
// - pitch: Vocal-band fundamental estimation with harmonic evidence
// - mod.rs: Coordinator (FeatureExtractor) and FeatureHistories

pub mod fft;
pub mod pitch;
pub mod temporal;
mod types;

use std::collections::VecDeque;

use rayon::prelude::*;

pub use fft::SpectrumEngine;
pub use types::{FrameFeatures, PitchEstimate, PowerSpectrum, SpectrumResult};

/// Analysis frames per second of audio (frame length = 0.1 s)
pub const FRAMES_PER_SECOND: usize = 10;

/// Number of most recent power spectra kept for timbre analysis
pub const SPECTRUM_RETENTION: usize = 10;

/// Samples per analysis frame: `floor(sample_rate * 0.1)`
pub fn frame_size_for(sample_rate: u32) -> usize {
    sample_rate as usize / FRAMES_PER_SECOND
}

/// FeatureExtractor coordinates spectrum, temporal and pitch extraction
pub struct FeatureExtractor {
    spectrum_engine: SpectrumEngine,
}

impl FeatureExtractor {
    /// Create a new FeatureExtractor with the specified sample rate
    ///
    /// # Arguments
    /// * `sample_rate` - Audio sample rate in Hz (e.g., 16000)
    pub fn new(sample_rate: u32) -> Self {
        Self {
            spectrum_engine: SpectrumEngine::new(sample_rate),
        }
    }

    /// Extract all features from one analysis frame
    ///
    /// # Arguments
    /// * `frame` - Time-domain samples, may be shorter than a full frame
    pub fn extract(&self, frame: &[f32]) -> FrameFeatures {
        let spectrum = self.spectrum_engine.analyze(frame).power_spectrum();
        let pitch = pitch::detect_pitch(&spectrum);

        FrameFeatures {
            rms: temporal::compute_rms(frame),
            zcr: temporal::compute_zcr(frame),
            pitch,
            spectrum,
        }
    }
}

/// Ordered per-frame feature sequences for one recording
///
/// Built incrementally with [`FeatureHistories::push`]; entries are never
/// rewritten once appended.
#[derive(Debug, Clone, Default)]
pub struct FeatureHistories {
    rms_history: Vec<f32>,
    zcr_history: Vec<f32>,
    pitch_history: Vec<f32>,
    frame_pitches: Vec<PitchEstimate>,
    spectrum_history: VecDeque<PowerSpectrum>,
}

impl FeatureHistories {
    pub fn with_capacity(frames: usize) -> Self {
        Self {
            rms_history: Vec::with_capacity(frames),
            zcr_history: Vec::with_capacity(frames),
            pitch_history: Vec::with_capacity(frames),
            frame_pitches: Vec::with_capacity(frames),
            spectrum_history: VecDeque::with_capacity(SPECTRUM_RETENTION + 1),
        }
    }

    /// Append the features of the next frame
    pub fn push(&mut self, frame: FrameFeatures) {
        self.rms_history.push(frame.rms);
        self.zcr_history.push(frame.zcr);
        if frame.pitch.is_pitched() {
            self.pitch_history.push(frame.pitch.frequency);
        }
        self.frame_pitches.push(frame.pitch);

        self.spectrum_history.push_back(frame.spectrum);
        if self.spectrum_history.len() > SPECTRUM_RETENTION {
            self.spectrum_history.pop_front();
        }
    }

    /// Number of frames pushed so far
    pub fn frame_count(&self) -> usize {
        self.rms_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rms_history.is_empty()
    }

    /// Per-frame RMS levels (also the volume history used for beat detection)
    pub fn rms_history(&self) -> &[f32] {
        &self.rms_history
    }

    pub fn zcr_history(&self) -> &[f32] {
        &self.zcr_history
    }

    /// Detected pitches in Hz, frames without pitch omitted
    pub fn pitch_history(&self) -> &[f32] {
        &self.pitch_history
    }

    /// Pitch estimate of every frame, including unpitched ones
    pub fn frame_pitches(&self) -> &[PitchEstimate] {
        &self.frame_pitches
    }

    /// Most recent power spectra, oldest first
    pub fn spectrum_history(&self) -> &VecDeque<PowerSpectrum> {
        &self.spectrum_history
    }
}

impl FromIterator<FrameFeatures> for FeatureHistories {
    fn from_iter<I: IntoIterator<Item = FrameFeatures>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut histories = Self::with_capacity(iter.size_hint().0);
        for frame in iter {
            histories.push(frame);
        }
        histories
    }
}

/// Cut `samples` into analysis frames and extract their feature histories
///
/// The trailing partial frame is processed like any other frame.
///
/// # Arguments
/// * `samples` - Concatenated recording, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `parallel` - Extract frames on the rayon pool
pub fn extract_histories(samples: &[f32], sample_rate: u32, parallel: bool) -> FeatureHistories {
    let frame_size = frame_size_for(sample_rate);
    if frame_size == 0 || samples.is_empty() {
        return FeatureHistories::default();
    }

    let extractor = FeatureExtractor::new(sample_rate);
    let frames: Vec<FrameFeatures> = if parallel {
        samples
            .par_chunks(frame_size)
            .map(|frame| extractor.extract(frame))
            .collect()
    } else {
        samples
            .chunks(frame_size)
            .map(|frame| extractor.extract(frame))
            .collect()
    };

    log::debug!(
        "[Features] Extracted {} frames of {} samples at {} Hz",
        frames.len(),
        frame_size,
        sample_rate
    );

    frames.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Generate pure sine wave for testing
    fn generate_sine_wave(sample_rate: u32, frequency: f32, amplitude: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * PI * frequency * t).sin()
            })
            .collect()
    }

    #[test]
    fn test_frame_size_is_a_tenth_of_a_second() {
        assert_eq!(frame_size_for(16000), 1600);
        assert_eq!(frame_size_for(44100), 4410);
        assert_eq!(frame_size_for(9), 0);
    }

    #[test]
    fn test_extract_sine_frame() {
        let extractor = FeatureExtractor::new(16000);
        let frame = generate_sine_wave(16000, 440.0, 0.5, 1600);
        let features = extractor.extract(&frame);

        assert!((features.rms - 0.5 / 2f32.sqrt()).abs() < 0.01);
        // 440 Hz at 16 kHz crosses zero ~880 times per second
        assert!((features.zcr - 0.055).abs() < 0.005, "zcr = {}", features.zcr);
        assert!((features.pitch.frequency - 440.0).abs() <= 7.9);
        assert_eq!(features.spectrum.len(), 1024);
    }

    #[test]
    fn test_trailing_partial_frame_is_processed() {
        let samples = generate_sine_wave(16000, 300.0, 0.3, 1600 * 3 + 400);
        let histories = extract_histories(&samples, 16000, false);
        assert_eq!(histories.frame_count(), 4);
        assert_eq!(histories.zcr_history().len(), 4);
        assert_eq!(histories.frame_pitches().len(), 4);
    }

    #[test]
    fn test_silent_frames_are_left_out_of_pitch_history() {
        let mut samples = vec![0.0; 1600 * 2];
        samples.extend(generate_sine_wave(16000, 300.0, 0.3, 1600 * 2));
        let histories = extract_histories(&samples, 16000, false);

        assert_eq!(histories.frame_count(), 4);
        assert_eq!(histories.pitch_history().len(), 2);
        assert!(!histories.frame_pitches()[0].is_pitched());
        assert!(histories.frame_pitches()[3].is_pitched());
    }

    #[test]
    fn test_spectrum_history_is_bounded() {
        let samples = generate_sine_wave(16000, 300.0, 0.3, 1600 * 25);
        let histories = extract_histories(&samples, 16000, false);
        assert_eq!(histories.frame_count(), 25);
        assert_eq!(histories.spectrum_history().len(), SPECTRUM_RETENTION);
    }

    #[test]
    fn test_parallel_extraction_matches_sequential() {
        let mut samples = generate_sine_wave(16000, 220.0, 0.4, 1600 * 12);
        samples.extend(generate_sine_wave(16000, 330.0, 0.2, 1600 * 12 + 77));

        let sequential = extract_histories(&samples, 16000, false);
        let parallel = extract_histories(&samples, 16000, true);

        assert_eq!(sequential.rms_history(), parallel.rms_history());
        assert_eq!(sequential.zcr_history(), parallel.zcr_history());
        assert_eq!(sequential.pitch_history(), parallel.pitch_history());
        assert_eq!(sequential.spectrum_history(), parallel.spectrum_history());
    }

    #[test]
    fn test_empty_input_produces_empty_histories() {
        let histories = extract_histories(&[], 16000, true);
        assert!(histories.is_empty());
        assert!(histories.spectrum_history().is_empty());
    }
}
