// Descriptive statistics shared by the gates and metric evaluators.

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population standard deviation, 0.0 for an empty slice
pub fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|&v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

/// Standard deviation relative to the mean
///
/// Returns `fallback` when the mean is not positive.
pub fn relative_std_dev(values: &[f32], fallback: f32) -> f32 {
    let m = mean(values);
    if m > 0.0 {
        std_dev(values) / m
    } else {
        fallback
    }
}

/// Smallest and largest value, `None` for an empty slice
pub fn min_max(values: &[f32]) -> Option<(f32, f32)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Round a score and clamp it to [0, 100]
pub fn round_score(score: f32) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}
