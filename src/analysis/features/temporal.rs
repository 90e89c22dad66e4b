// Temporal module - Time-domain feature extraction
//
// RMS (volume proxy) and zero-crossing rate (timbre proxy) computed directly
// on the time-domain frame. Both are pure and O(n).

/// Compute root-mean-square level
///
/// Formula: RMS = sqrt((1 / N) × Σ x[n]²)
///
/// # Returns
/// RMS level (0.0 to 1.0 for normalized input, 0.0 for an empty frame)
pub fn compute_rms(audio: &[f32]) -> f32 {
    if audio.is_empty() {
        return 0.0;
    }

    let sum: f32 = audio.iter().map(|&x| x * x).sum();
    (sum / audio.len() as f32).sqrt()
}

/// Compute zero-crossing rate (ZCR)
///
/// ZCR measures how often the signal changes sign. Zero is treated as
/// positive, so a crossing is a move between `< 0` and `>= 0`.
///
/// # Returns
/// Zero-crossing rate (0.0 to 1.0), 0.0 for frames shorter than 2 samples
pub fn compute_zcr(audio: &[f32]) -> f32 {
    if audio.len() < 2 {
        return 0.0;
    }

    let crossings = audio
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();

    // Normalize by number of sample pairs
    crossings as f32 / (audio.len() - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_constant_signal() {
        assert!((compute_rms(&[0.5; 100]) - 0.5).abs() < 1e-6);
        assert!((compute_rms(&[-0.5; 100]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rms_of_empty_frame_is_zero() {
        assert_eq!(compute_rms(&[]), 0.0);
    }

    #[test]
    fn test_rms_of_square_wave() {
        let signal: Vec<f32> = (0..100).map(|i| if i % 2 == 0 { 0.3 } else { -0.3 }).collect();
        assert!((compute_rms(&signal) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_zcr_alternating_signal_is_one() {
        let signal: Vec<f32> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!((compute_zcr(&signal) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zcr_zero_counts_as_positive() {
        // 0.0 -> -1.0 is a crossing, -1.0 -> 0.0 is a crossing, 0.0 -> 0.0 is not
        let signal = [0.0, -1.0, 0.0, 0.0];
        assert!((compute_zcr(&signal) - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zcr_short_frames() {
        assert_eq!(compute_zcr(&[]), 0.0);
        assert_eq!(compute_zcr(&[0.7]), 0.0);
        assert_eq!(compute_zcr(&[0.0; 1600]), 0.0);
    }
}
