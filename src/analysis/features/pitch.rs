// Pitch module - Fundamental frequency estimation from the power spectrum
//
// The candidate fundamental is the strongest bin inside the vocal band.
// Harmonic bins (2x..5x) are then checked; their count is reported as
// evidence but does not change the returned frequency.

use std::ops::RangeInclusive;

use super::types::{PitchEstimate, PowerSpectrum};

/// Lowest frequency considered a vocal fundamental (Hz)
pub const VOCAL_BAND_MIN_HZ: f32 = 80.0;

/// Highest frequency considered a vocal fundamental (Hz)
pub const VOCAL_BAND_MAX_HZ: f32 = 1000.0;

/// Harmonic multiples inspected for reinforcement
pub const HARMONIC_MULTIPLES: RangeInclusive<u32> = 2..=5;

/// A harmonic counts when its power exceeds this fraction of the fundamental's
pub const HARMONIC_POWER_RATIO: f32 = 0.3;

/// Whether `frequency` lies in the closed vocal band [80, 1000] Hz
pub fn in_vocal_band(frequency: f32) -> bool {
    (VOCAL_BAND_MIN_HZ..=VOCAL_BAND_MAX_HZ).contains(&frequency)
}

/// Estimate the fundamental frequency of one frame
///
/// # Arguments
/// * `spectrum` - Power spectrum of the frame
///
/// # Returns
/// `PitchEstimate` with frequency 0.0 when no in-band bin holds power
pub fn detect_pitch(spectrum: &PowerSpectrum) -> PitchEstimate {
    let mut max_power = 0.0f32;
    let mut pitch_freq = 0.0f32;

    for (i, &power) in spectrum.power.iter().enumerate() {
        let freq = spectrum.frequency(i);
        if in_vocal_band(freq) && power > max_power {
            max_power = power;
            pitch_freq = freq;
        }
    }

    if pitch_freq <= 0.0 {
        return PitchEstimate::NONE;
    }

    PitchEstimate {
        frequency: pitch_freq,
        harmonic_evidence: count_harmonics(spectrum, pitch_freq, max_power),
    }
}

/// Count harmonics of `fundamental` whose power exceeds 30% of `reference_power`
///
/// Harmonics falling past the last bin are ignored.
pub fn count_harmonics(spectrum: &PowerSpectrum, fundamental: f32, reference_power: f32) -> u8 {
    let threshold = reference_power * HARMONIC_POWER_RATIO;
    HARMONIC_MULTIPLES
        .filter_map(|h| spectrum.bin_for(fundamental * h as f32))
        .filter(|&bin| spectrum.power[bin] > threshold)
        .count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::fft::SpectrumEngine;
    use std::f32::consts::PI;

    fn sine(sample_rate: u32, frequency: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn spectrum_of(signal: &[f32], sample_rate: u32) -> PowerSpectrum {
        SpectrumEngine::new(sample_rate)
            .analyze(signal)
            .power_spectrum()
    }

    #[test]
    fn test_pure_tone_within_one_bin() {
        let sample_rate = 16000;
        for &freq in &[110.0f32, 220.0, 440.0, 523.25, 880.0] {
            let spectrum = spectrum_of(&sine(sample_rate, freq, 1600), sample_rate);
            let estimate = detect_pitch(&spectrum);
            assert!(
                (estimate.frequency - freq).abs() <= spectrum.bin_width,
                "Expected {} Hz within one bin ({} Hz), got {} Hz",
                freq,
                spectrum.bin_width,
                estimate.frequency
            );
        }
    }

    #[test]
    fn test_silence_has_no_pitch() {
        let spectrum = spectrum_of(&[0.0; 1600], 16000);
        assert_eq!(detect_pitch(&spectrum), PitchEstimate::NONE);
    }

    #[test]
    fn test_out_of_band_tone_is_ignored_for_candidate() {
        // A strong 3 kHz tone must not be picked; only in-band leakage remains
        let spectrum = spectrum_of(&sine(16000, 3000.0, 1600), 16000);
        let estimate = detect_pitch(&spectrum);
        assert!(estimate.frequency == 0.0 || in_vocal_band(estimate.frequency));
    }

    #[test]
    fn test_harmonic_evidence_counts_overtones() {
        let sample_rate = 16000;
        let signal: Vec<f32> = (0..1600)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                // 250/500/750 Hz sit exactly on bins 32/64/96 of the 2048-point grid
                0.5 * (2.0 * PI * 250.0 * t).sin()
                    + 0.4 * (2.0 * PI * 500.0 * t).sin()
                    + 0.4 * (2.0 * PI * 750.0 * t).sin()
            })
            .collect();

        let estimate = detect_pitch(&spectrum_of(&signal, sample_rate));
        assert!((estimate.frequency - 250.0).abs() < 1e-3);
        assert!(
            estimate.harmonic_evidence >= 2,
            "Expected at least 2 harmonics, got {}",
            estimate.harmonic_evidence
        );
    }

    #[test]
    fn test_pure_tone_reports_candidate_without_harmonics() {
        let estimate = detect_pitch(&spectrum_of(&sine(16000, 250.0, 1600), 16000));
        assert!(estimate.is_pitched());
        assert_eq!(estimate.harmonic_evidence, 0);
    }

    #[test]
    fn test_count_harmonics_skips_bins_past_nyquist() {
        let spectrum = PowerSpectrum {
            power: vec![1.0; 8],
            bin_width: 100.0,
        };
        // 300 Hz harmonics: 600 (bin 6) counts, 900/1200/1500 are out of range
        assert_eq!(count_harmonics(&spectrum, 300.0, 1.0), 1);
    }
}
