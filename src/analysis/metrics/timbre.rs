// Timbre - scores vocal tone quality
//
// Three parts:
// - ZCR band score (voice texture)
// - harmonic structure of the retained spectra
// - spectral richness of the oldest retained spectrum
//
// The blend is boosted and floored so timbre never reports below 50.

use crate::analysis::features::pitch::{count_harmonics, in_vocal_band};
use crate::analysis::features::{PowerSpectrum, SPECTRUM_RETENTION};
use crate::analysis::stats;

/// Lowest timbre score ever reported
pub const TIMBRE_FLOOR: f32 = 50.0;

const ZCR_WEIGHT: f32 = 0.4;
const HARMONIC_WEIGHT: f32 = 0.4;
const RICHNESS_WEIGHT: f32 = 0.2;

/// Ideal ZCR band, scored 100
pub const IDEAL_ZCR_BAND: (f32, f32) = (0.08, 0.12);
/// Voice ZCR band, scored [`VOICE_ZCR_SCORE`]
pub const VOICE_ZCR_BAND: (f32, f32) = (0.05, 0.15);
/// Tolerable ZCR band, scored [`TOLERABLE_ZCR_SCORE`]
pub const TOLERABLE_ZCR_BAND: (f32, f32) = (0.03, 0.25);

const VOICE_ZCR_SCORE: f32 = 90.0;
const TOLERABLE_ZCR_SCORE: f32 = 75.0;
const ZCR_DEVIATION_SLOPE: f32 = 500.0;

const POINTS_PER_HARMONIC: f32 = 15.0;
const MAX_HARMONIC_POINTS: f32 = 60.0;
const OFF_BAND_HARMONIC_POINTS: f32 = 40.0;
const RICHNESS_POWER_RATIO: f32 = 0.1;
const RICHNESS_POINTS_PER_BIN: f32 = 2.0;

/// Blends below this are lifted to [`TIMBRE_FLOOR`] by the boost
const SMALL_BOOST_LIMIT: f32 = 70.0;
const LARGE_BOOST: f32 = 5.0;
const BOOST_LIMIT: f32 = 85.0;
const SMALL_BOOST: f32 = 3.0;

fn in_band(value: f32, (low, high): (f32, f32)) -> bool {
    (low..=high).contains(&value)
}

/// Score the mean ZCR against the voice texture bands
pub fn zcr_score(mean_zcr: f32) -> f32 {
    let (tolerable_min, tolerable_max) = TOLERABLE_ZCR_BAND;
    if in_band(mean_zcr, IDEAL_ZCR_BAND) {
        100.0
    } else if in_band(mean_zcr, VOICE_ZCR_BAND) {
        VOICE_ZCR_SCORE
    } else if in_band(mean_zcr, TOLERABLE_ZCR_BAND) {
        TOLERABLE_ZCR_SCORE
    } else {
        let deviation = if mean_zcr < tolerable_min {
            tolerable_min - mean_zcr
        } else {
            mean_zcr - tolerable_max
        };
        (100.0 - deviation * ZCR_DEVIATION_SLOPE).max(TIMBRE_FLOOR)
    }
}

fn harmonic_points(spectrum: &PowerSpectrum) -> Option<f32> {
    let (peak_bin, peak_power) = spectrum.peak()?;
    let fundamental = spectrum.frequency(peak_bin);

    let points = if in_vocal_band(fundamental) {
        let harmonics = count_harmonics(spectrum, fundamental, peak_power);
        (harmonics as f32 * POINTS_PER_HARMONIC).min(MAX_HARMONIC_POINTS)
    } else {
        OFF_BAND_HARMONIC_POINTS
    };
    Some(points)
}

fn richness_score(spectrum: &PowerSpectrum) -> f32 {
    let threshold = spectrum.peak().map(|(_, p)| p).unwrap_or(0.0) * RICHNESS_POWER_RATIO;
    let active = spectrum.power.iter().filter(|&&p| p > threshold).count();
    if active == 0 {
        TIMBRE_FLOOR
    } else {
        (active as f32 * RICHNESS_POINTS_PER_BIN).clamp(TIMBRE_FLOOR, 100.0)
    }
}

fn boost(score: f32) -> f32 {
    if score < TIMBRE_FLOOR {
        TIMBRE_FLOOR
    } else if score < SMALL_BOOST_LIMIT {
        score + LARGE_BOOST
    } else if score < BOOST_LIMIT {
        score + SMALL_BOOST
    } else {
        score
    }
}

/// Score the timbre of a recording
///
/// # Arguments
/// * `zcr_history` - Per-frame zero-crossing rates
/// * `spectra` - Retained power spectra, oldest first (at most 10 are read)
///
/// # Returns
/// Score in [50, 100]
pub fn evaluate_timbre<'a, I>(zcr_history: &[f32], spectra: I) -> u8
where
    I: IntoIterator<Item = &'a PowerSpectrum>,
{
    let spectra: Vec<&PowerSpectrum> = spectra.into_iter().take(SPECTRUM_RETENTION).collect();
    let Some(oldest) = spectra.first() else {
        return TIMBRE_FLOOR as u8;
    };
    if zcr_history.is_empty() {
        return TIMBRE_FLOOR as u8;
    }

    let zcr = zcr_score(stats::mean(zcr_history));

    let points: Vec<f32> = spectra.iter().filter_map(|s| harmonic_points(s)).collect();
    let harmonic = if points.is_empty() {
        TIMBRE_FLOOR
    } else {
        stats::mean(&points).max(TIMBRE_FLOOR)
    };

    let richness = richness_score(oldest);

    let blended = zcr * ZCR_WEIGHT + harmonic * HARMONIC_WEIGHT + richness * RICHNESS_WEIGHT;
    let score = stats::round_score(boost(blended)).max(TIMBRE_FLOOR as u8);

    log::debug!(
        "[Timbre] zcr {:.1}, harmonic {:.1}, richness {:.1} -> {}",
        zcr,
        harmonic,
        richness,
        score
    );

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIN_WIDTH: f32 = 15.625;

    fn silent_spectrum() -> PowerSpectrum {
        PowerSpectrum {
            power: vec![0.0; 1024],
            bin_width: BIN_WIDTH,
        }
    }

    fn voiced_spectrum() -> PowerSpectrum {
        // 250 Hz fundamental (bin 16) with four harmonics
        let mut power = vec![0.0; 1024];
        power[16] = 1.0;
        for bin in [32, 48, 64, 80] {
            power[bin] = 0.5;
        }
        PowerSpectrum {
            power,
            bin_width: BIN_WIDTH,
        }
    }

    #[test]
    fn test_zcr_bands() {
        assert_eq!(zcr_score(0.1), 100.0);
        assert_eq!(zcr_score(0.06), 90.0);
        assert_eq!(zcr_score(0.04), 75.0);
        assert_eq!(zcr_score(0.2), 75.0);
        assert!((zcr_score(0.0) - 85.0).abs() < 1e-4);
        assert_eq!(zcr_score(0.5), TIMBRE_FLOOR);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(evaluate_timbre(&[], &[voiced_spectrum()]), 50);
        assert_eq!(evaluate_timbre(&[0.1], &[] as &[PowerSpectrum]), 50);
    }

    #[test]
    fn test_silence() {
        let spectra = vec![silent_spectrum(); 10];
        // zcr 85, harmonic 40 -> 50, richness 50: 64 boosted by 5
        assert_eq!(evaluate_timbre(&[0.0; 600], &spectra), 69);
    }

    #[test]
    fn test_voiced_spectra() {
        let spectra = vec![voiced_spectrum(); 10];
        // zcr 100, harmonic 60, richness 50: 74 boosted by 3
        assert_eq!(evaluate_timbre(&[0.1; 100], &spectra), 77);
    }

    #[test]
    fn test_off_band_peak_gets_baseline_points() {
        let mut spectrum = silent_spectrum();
        spectrum.power[200] = 1.0;
        assert_eq!(harmonic_points(&spectrum), Some(OFF_BAND_HARMONIC_POINTS));
        assert_eq!(harmonic_points(&PowerSpectrum::default()), None);
    }

    #[test]
    fn test_rich_spectrum() {
        let spectrum = PowerSpectrum {
            power: vec![1.0; 1024],
            bin_width: BIN_WIDTH,
        };
        assert_eq!(richness_score(&spectrum), 100.0);
        assert_eq!(richness_score(&voiced_spectrum()), TIMBRE_FLOOR);
    }

    #[test]
    fn test_never_below_floor() {
        for zcr in [0.0, 0.02, 0.3, 0.6, 1.0] {
            let score = evaluate_timbre(&[zcr; 20], &[silent_spectrum()]);
            assert!(score >= 50, "zcr {} gave {}", zcr, score);
        }
    }
}
