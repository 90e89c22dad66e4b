//! Quality gates evaluated before scoring.
//!
//! Each gate produces a typed check with its own reason enum. The
//! [`QualityGate`] trait gives the composer and the result report a common
//! `passed / value / reason` view over all of them.

pub mod duration;
pub mod melody;
pub mod voice;

use serde::{Deserialize, Serialize};

use crate::analysis::features::FeatureHistories;
use crate::config::AnalysisConfig;

pub use duration::{check_duration, DurationCheck, DurationReason};
pub use melody::{detect_melody, MelodyCheck, MelodyReason};
pub use voice::{detect_voice, VoiceCheck, VoiceReason};

/// Uniform projection of a gate outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    pub passed: bool,
    /// Penalty fraction, confidence or normalized score, depending on the gate
    pub value: f32,
    pub reason: String,
}

/// Common view over the duration, voice and melody checks
pub trait QualityGate {
    fn passed(&self) -> bool;

    fn value(&self) -> f32;

    /// Human readable explanation of the outcome
    fn reason_text(&self) -> String;

    fn to_gate_result(&self) -> GateResult {
        GateResult {
            passed: self.passed(),
            value: self.value(),
            reason: self.reason_text(),
        }
    }
}

/// Outcomes of all three gates for one recording
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    pub duration: DurationCheck,
    pub voice: VoiceCheck,
    pub melody: MelodyCheck,
}

impl GateReport {
    /// Run every gate, substituting the disabled results for switched-off gates
    ///
    /// When the voice gate rejects the recording the melody gate is not run
    /// and reports [`MelodyReason::NoVoice`].
    ///
    /// # Arguments
    /// * `histories` - Feature histories of the recording
    /// * `duration` - Claimed duration in seconds
    /// * `config` - Gate switches
    pub fn evaluate(histories: &FeatureHistories, duration: f32, config: &AnalysisConfig) -> Self {
        let voice = if config.voice_gate {
            detect_voice(histories)
        } else {
            VoiceCheck::disabled()
        };

        let melody = if !voice.is_voice {
            MelodyCheck::no_voice()
        } else if config.melody_gate {
            detect_melody(histories.pitch_history())
        } else {
            MelodyCheck::disabled()
        };

        Self {
            duration: check_duration(duration),
            voice,
            melody,
        }
    }

    /// Whether the enabled voice gate rejected the recording
    pub fn rejects_voice(&self) -> bool {
        !self.voice.is_voice
    }

    /// Gate results in `duration, voice, melody` order
    pub fn gate_results(&self) -> [GateResult; 3] {
        [
            self.duration.to_gate_result(),
            self.voice.to_gate_result(),
            self.melody.to_gate_result(),
        ]
    }
}
