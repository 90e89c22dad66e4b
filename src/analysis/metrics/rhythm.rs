// Rhythm - scores regularity of loudness pulses
//
// Beats are strict local maxima of the RMS history above 70% of its mean.
// Regular inter-beat intervals score high and a density bonus rewards a
// clearly pulsed performance. Short or beatless histories fall back to
// fixed heuristics.

use crate::analysis::stats;

/// Histories shorter than this use the duration-based default
pub const MIN_HISTORY: usize = 10;
/// Beat candidates must exceed this fraction of the mean volume
pub const BEAT_THRESHOLD_RATIO: f32 = 0.7;

/// Claimed durations inside this window earn the short-history bonus
pub const SHORT_HISTORY_WINDOW_SECS: (f32, f32) = (10.0, 120.0);

const SHORT_HISTORY_BASE: f32 = 55.0;
const SHORT_HISTORY_MAX_BONUS: f32 = 15.0;
const SHORT_HISTORY_SECS_PER_POINT: f32 = 10.0;
const NEUTRAL_SCORE: u8 = 50;

/// Fallback when fewer than two beats are found
const FALLBACK_VARIATION: f32 = 0.1;
const FALLBACK_MEAN_VOLUME: f32 = 0.05;
const FALLBACK_PULSED_SCORE: u8 = 60;

const INTERVAL_SLOPE: f32 = 150.0;
const MAX_DENSITY_BONUS: f32 = 20.0;
const DENSITY_SCALE: f32 = 10.0;

/// Find indices of beats in a volume history
pub fn detect_beats(volume_history: &[f32]) -> Vec<usize> {
    let threshold = stats::mean(volume_history) * BEAT_THRESHOLD_RATIO;
    volume_history
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > threshold && w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

fn short_history_score(duration: f32) -> f32 {
    let (window_min, window_max) = SHORT_HISTORY_WINDOW_SECS;
    if (window_min..=window_max).contains(&duration) {
        SHORT_HISTORY_BASE + (duration / SHORT_HISTORY_SECS_PER_POINT).min(SHORT_HISTORY_MAX_BONUS)
    } else {
        NEUTRAL_SCORE as f32
    }
}

/// Score the rhythm of a recording
///
/// # Arguments
/// * `volume_history` - Per-frame RMS levels
/// * `duration` - Claimed duration in seconds, used for beat density
pub fn evaluate_rhythm(volume_history: &[f32], duration: f32) -> u8 {
    if volume_history.len() < MIN_HISTORY {
        return stats::round_score(short_history_score(duration));
    }

    let beats = detect_beats(volume_history);
    if beats.len() < 2 {
        let variation = stats::min_max(volume_history)
            .map(|(lo, hi)| hi - lo)
            .unwrap_or(0.0);
        let score = if variation > FALLBACK_VARIATION
            && stats::mean(volume_history) > FALLBACK_MEAN_VOLUME
        {
            FALLBACK_PULSED_SCORE
        } else {
            NEUTRAL_SCORE
        };
        log::debug!("[Rhythm] {} beats, fallback score {}", beats.len(), score);
        return score;
    }

    let intervals: Vec<f32> = beats.windows(2).map(|w| (w[1] - w[0]) as f32).collect();
    let regularity = stats::relative_std_dev(&intervals, 1.0);
    let stability = (100.0 - regularity * INTERVAL_SLOPE).max(0.0);

    // A zero or negative claimed duration means unbounded beat density
    let density = if duration > 0.0 {
        (beats.len() as f32 / duration * DENSITY_SCALE).min(MAX_DENSITY_BONUS)
    } else {
        MAX_DENSITY_BONUS
    };

    log::debug!(
        "[Rhythm] {} beats, stability {:.1}, density {:.1}",
        beats.len(),
        stability,
        density
    );

    stats::round_score((stability + density).min(100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pulses(len: usize, beat_frames: &[usize]) -> Vec<f32> {
        (0..len)
            .map(|i| if beat_frames.contains(&i) { 0.5 } else { 0.1 })
            .collect()
    }

    #[test]
    fn test_short_history_uses_duration() {
        assert_eq!(evaluate_rhythm(&[0.2; 5], 30.0), 58);
        assert_eq!(evaluate_rhythm(&[0.2; 5], 120.0), 67);
        assert_eq!(evaluate_rhythm(&[0.2; 5], 5.0), 50);
        assert_eq!(evaluate_rhythm(&[], 200.0), 50);
    }

    #[test]
    fn test_detect_beats_requires_strict_peaks() {
        let history = [0.1, 0.5, 0.5, 0.1, 0.6, 0.1];
        assert_eq!(detect_beats(&history), vec![4]);
    }

    #[test]
    fn test_regular_pulses_score_full() {
        let beats: Vec<usize> = (0..10).map(|i| i * 5 + 2).collect();
        let history = pulses(50, &beats);
        assert_eq!(detect_beats(&history), beats);
        assert_eq!(evaluate_rhythm(&history, 5.0), 100);
    }

    #[test]
    fn test_irregular_pulses_lose_stability() {
        // intervals alternate 2 and 6 frames
        let history = pulses(30, &[2, 4, 10, 12, 18, 20, 26, 28]);
        assert_eq!(evaluate_rhythm(&history, 30.0), 23);
    }

    #[test]
    fn test_beatless_fallbacks() {
        let ramp: Vec<f32> = (0..20).map(|i| i as f32 / 20.0).collect();
        assert_eq!(evaluate_rhythm(&ramp, 2.0), 60);
        assert_eq!(evaluate_rhythm(&[0.0; 600], 60.0), 50);
    }

    #[test]
    fn test_zero_duration_earns_full_density_bonus() {
        // stability ~20.3 plus the capped bonus of 20
        let history = pulses(30, &[2, 4, 10, 12, 18, 20, 26, 28]);
        assert_eq!(evaluate_rhythm(&history, 0.0), 40);
        assert_eq!(evaluate_rhythm(&history, -3.0), 40);
    }
}
