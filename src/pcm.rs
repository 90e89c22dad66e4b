//! PCM sample conversion helpers.

/// Convert one signed 16-bit sample to [-1.0, 1.0]
#[inline]
pub fn normalize_sample(sample: i16) -> f32 {
    (sample as f32 / i16::MAX as f32).clamp(-1.0, 1.0)
}

/// Convert a block of signed 16-bit samples to normalized floats
///
/// `i16::MIN` maps to -1.0 (clamped) so the output stays symmetric.
pub fn normalize_i16(samples: &[i16]) -> Vec<f32> {
    samples.iter().copied().map(normalize_sample).collect()
}
