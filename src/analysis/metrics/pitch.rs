// PitchAccuracy - scores pitch stability and vocal-range placement
//
// No target melody exists, so accuracy is judged by how steady the detected
// pitch stays (relative standard deviation) plus a small bonus depending on
// where the mean pitch sits inside the human vocal range.

use crate::analysis::features::pitch::{VOCAL_BAND_MAX_HZ, VOCAL_BAND_MIN_HZ};
use crate::analysis::stats;

/// Score returned when no pitch was detected at all
pub const NO_PITCH_SCORE: u8 = 45;

const STABILITY_WEIGHT: f32 = 0.7;
const RANGE_WEIGHT: f32 = 0.3;
const STABILITY_SLOPE: f32 = 200.0;

/// Lower edge of the comfortable singing range (Hz)
pub const COMFORT_RANGE_MIN_HZ: f32 = 200.0;
/// Upper edge of the comfortable singing range (Hz)
pub const COMFORT_RANGE_MAX_HZ: f32 = 600.0;

const COMFORT_RANGE_SCORE: f32 = 85.0;
const LOW_RANGE_SCORE: f32 = 75.0;
const HIGH_RANGE_SCORE: f32 = 80.0;
const OUT_OF_RANGE_SCORE: f32 = 50.0;

/// Range bonus by mean pitch
fn range_score(mean_pitch: f32) -> f32 {
    if (COMFORT_RANGE_MIN_HZ..=COMFORT_RANGE_MAX_HZ).contains(&mean_pitch) {
        COMFORT_RANGE_SCORE
    } else if (VOCAL_BAND_MIN_HZ..COMFORT_RANGE_MIN_HZ).contains(&mean_pitch) {
        LOW_RANGE_SCORE
    } else if mean_pitch > COMFORT_RANGE_MAX_HZ && mean_pitch <= VOCAL_BAND_MAX_HZ {
        HIGH_RANGE_SCORE
    } else {
        OUT_OF_RANGE_SCORE
    }
}

/// Score the detected pitch history
///
/// # Arguments
/// * `pitch_history` - Detected pitches in Hz (unpitched frames omitted)
///
/// # Returns
/// Score in [0, 100]
pub fn evaluate_pitch(pitch_history: &[f32]) -> u8 {
    if pitch_history.is_empty() {
        return NO_PITCH_SCORE;
    }

    let mean = stats::mean(pitch_history);
    let relative_std_dev = stats::relative_std_dev(pitch_history, 1.0);
    let stability = (100.0 - relative_std_dev * STABILITY_SLOPE).max(0.0);

    stats::round_score(stability * STABILITY_WEIGHT + range_score(mean) * RANGE_WEIGHT)
}
