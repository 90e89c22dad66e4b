// Volume - scores loudness level, steadiness and dynamic range

use crate::analysis::stats;

/// Score returned for an empty RMS history
pub const EMPTY_HISTORY_SCORE: u8 = 50;

const LEVEL_WEIGHT: f32 = 0.5;
const STABILITY_WEIGHT: f32 = 0.3;
const DYNAMIC_WEIGHT: f32 = 0.2;
const STABILITY_SLOPE: f32 = 200.0;

/// Mean RMS below this is near silence
pub const QUIET_RMS: f32 = 0.05;
/// Start of the soft band
pub const SOFT_RMS: f32 = 0.1;
/// Start of the best loudness band
pub const BEST_BAND_MIN_RMS: f32 = 0.2;
/// Loudness with the highest level score
pub const BEST_RMS: f32 = 0.4;
/// End of the best loudness band
pub const BEST_BAND_MAX_RMS: f32 = 0.6;
/// Past this mean RMS the level decays quickly
pub const LOUD_RMS: f32 = 0.8;

const QUIET_SLOPE: f32 = 600.0;
const SOFT_BASE: f32 = 30.0;
const SOFT_SLOPE: f32 = 400.0;
const MODERATE_BASE: f32 = 70.0;
const MODERATE_SLOPE: f32 = 150.0;
const BEST_BASE: f32 = 85.0;
const BEST_SLOPE: f32 = 15.0;
const LOUD_SLOPE: f32 = 150.0;
const CLIPPING_SLOPE: f32 = 500.0;

/// Peak-to-trough RMS below this counts as flat
pub const FLAT_RANGE: f32 = 0.1;
/// Peak-to-trough RMS above this counts as wild
pub const WILD_RANGE: f32 = 0.7;

const FLAT_DYNAMIC_SCORE: f32 = 60.0;
const WILD_DYNAMIC_SCORE: f32 = 70.0;
const MODERATE_DYNAMIC_SCORE: f32 = 85.0;

/// Map mean RMS through the loudness curve (peak 100 at 0.4)
pub fn level_score(mean_rms: f32) -> f32 {
    if mean_rms < QUIET_RMS {
        mean_rms * QUIET_SLOPE
    } else if mean_rms < SOFT_RMS {
        SOFT_BASE + (mean_rms - QUIET_RMS) * SOFT_SLOPE
    } else if mean_rms < BEST_BAND_MIN_RMS {
        MODERATE_BASE + (mean_rms - SOFT_RMS) * MODERATE_SLOPE
    } else if mean_rms <= BEST_BAND_MAX_RMS {
        BEST_BASE + (BEST_RMS - (mean_rms - BEST_RMS).abs()) * BEST_SLOPE
    } else if mean_rms <= LOUD_RMS {
        BEST_BASE - (mean_rms - BEST_BAND_MAX_RMS) * LOUD_SLOPE
    } else {
        (100.0 - (mean_rms - LOUD_RMS) * CLIPPING_SLOPE).max(0.0)
    }
}

fn dynamic_score(range: f32) -> f32 {
    if range < FLAT_RANGE {
        FLAT_DYNAMIC_SCORE
    } else if range > WILD_RANGE {
        WILD_DYNAMIC_SCORE
    } else {
        MODERATE_DYNAMIC_SCORE
    }
}

/// Score the loudness profile of a recording
///
/// # Arguments
/// * `rms_history` - Per-frame RMS levels
pub fn evaluate_volume(rms_history: &[f32]) -> u8 {
    let Some((lo, hi)) = stats::min_max(rms_history) else {
        return EMPTY_HISTORY_SCORE;
    };

    let mean = stats::mean(rms_history);
    let relative_std_dev = stats::relative_std_dev(rms_history, 1.0);
    let stability = (100.0 - relative_std_dev * STABILITY_SLOPE).max(0.0);

    stats::round_score(
        level_score(mean) * LEVEL_WEIGHT
            + stability * STABILITY_WEIGHT
            + dynamic_score(hi - lo) * DYNAMIC_WEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_curve() {
        let cases = [
            (0.0, 0.0),
            (0.02, 12.0),
            (0.075, 40.0),
            (0.15, 77.5),
            (0.4, 91.0),
            (0.7, 70.0),
            (0.9, 50.0),
            (1.2, 0.0),
        ];
        for (rms, expected) in cases {
            let got = level_score(rms);
            assert!((got - expected).abs() < 1e-3, "level({}) = {}, expected {}", rms, got, expected);
        }
    }

    #[test]
    fn test_silence_scores_low() {
        // level 0, stability 0, flat dynamics 60
        assert_eq!(evaluate_volume(&[0.0; 600]), 12);
    }

    #[test]
    fn test_steady_comfortable_level() {
        // level 89.5, stability 100, flat dynamics 60
        assert_eq!(evaluate_volume(&[0.3; 100]), 87);
    }

    #[test]
    fn test_dynamic_range_bands() {
        assert_eq!(dynamic_score(0.05), 60.0);
        assert_eq!(dynamic_score(0.3), 85.0);
        assert_eq!(dynamic_score(0.9), 70.0);
    }

    #[test]
    fn test_unsteady_level_loses_points() {
        // mean 0.325, rel std ~0.23, range 0.15
        let varied: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 0.25 } else { 0.4 }).collect();
        assert_eq!(evaluate_volume(&varied), 78);
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(evaluate_volume(&[]), EMPTY_HISTORY_SCORE);
    }
}
