//! Metric evaluators: pitch accuracy, rhythm, volume and timbre.
//!
//! Every evaluator reads the full feature histories of a recording and
//! returns an integer score in [0, 100].

pub mod pitch;
pub mod rhythm;
pub mod timbre;
pub mod volume;

use serde::{Deserialize, Serialize};

use crate::analysis::features::FeatureHistories;

pub use pitch::evaluate_pitch;
pub use rhythm::evaluate_rhythm;
pub use timbre::evaluate_timbre;
pub use volume::evaluate_volume;

/// The four per-metric scores of one recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricScores {
    pub pitch: u8,
    pub rhythm: u8,
    pub volume: u8,
    pub timbre: u8,
}

impl MetricScores {
    /// Run all four evaluators
    ///
    /// # Arguments
    /// * `histories` - Feature histories of the recording
    /// * `duration` - Claimed duration in seconds
    pub fn evaluate(histories: &FeatureHistories, duration: f32) -> Self {
        let scores = Self {
            pitch: evaluate_pitch(histories.pitch_history()),
            rhythm: evaluate_rhythm(histories.rms_history(), duration),
            volume: evaluate_volume(histories.rms_history()),
            timbre: evaluate_timbre(histories.zcr_history(), histories.spectrum_history()),
        };

        log::debug!(
            "[Metrics] pitch={} rhythm={} volume={} timbre={}",
            scores.pitch,
            scores.rhythm,
            scores.volume,
            scores.timbre
        );

        scores
    }

    /// Unweighted mean of the four scores
    pub fn average(&self) -> f32 {
        (self.pitch as f32 + self.rhythm as f32 + self.volume as f32 + self.timbre as f32) / 4.0
    }
}
