// MelodyGate - distinguishes sung melody from flat speech
//
// Works on the pitch history restricted to the open vocal band. Three
// relative measures describe pitch movement: mean frame-to-frame change,
// range over the lowest pitch and standard deviation over the mean.
// Clear speaking and clear singing profiles decide directly; anything in
// between falls back to a weighted melody score.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::QualityGate;
use crate::analysis::features::pitch::{VOCAL_BAND_MAX_HZ, VOCAL_BAND_MIN_HZ};
use crate::analysis::stats;

/// Pitch histories shorter than this cannot be judged
pub const MIN_PITCH_HISTORY: usize = 10;
/// Fewer valid pitches than this cannot be judged
pub const MIN_VALID_PITCHES: usize = 5;

/// Relative frame-to-frame change separating speech from song
pub const CHANGE_THRESHOLD: f32 = 0.05;
/// Relative pitch range separating speech from song
pub const RANGE_THRESHOLD: f32 = 0.15;
/// Relative standard deviation separating speech from song
pub const STD_DEV_THRESHOLD: f32 = 0.08;

/// Melody is present in the ambiguous zone when the score reaches this
pub const MELODY_SCORE_THRESHOLD: f32 = 30.0;

/// Score reported when the gate is disabled
pub const DISABLED_MELODY_SCORE: f32 = 50.0;

const CHANGE_SCALE: f32 = 1000.0;
const RANGE_SCALE: f32 = 500.0;
const STD_DEV_SCALE: f32 = 1000.0;

const CHANGE_WEIGHT: f32 = 0.3;
const RANGE_WEIGHT: f32 = 0.4;
const STD_DEV_WEIGHT: f32 = 0.3;

/// Why the melody gate reached its decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MelodyReason {
    /// Gate switched off by the caller
    Disabled,
    /// Fewer than [`MIN_PITCH_HISTORY`] pitches or [`MIN_VALID_PITCHES`] in-band ones
    InsufficientData,
    /// Not evaluated because the voice gate rejected the recording
    NoVoice,
    /// Flat, narrow pitch profile typical of speech
    Speaking,
    /// Moving, wide pitch profile typical of song
    Singing,
    /// Ambiguous profile with a passing melody score
    SomeMelody,
    /// Ambiguous profile with a failing melody score
    FlatMelody,
}

impl fmt::Display for MelodyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MelodyReason::Disabled => "Melody detection disabled",
            MelodyReason::InsufficientData => "Not enough pitch data to detect a melody",
            MelodyReason::NoVoice => "No voice detected",
            MelodyReason::Speaking => "Sounds like speaking, try singing",
            MelodyReason::Singing => "Clear melodic movement detected",
            MelodyReason::SomeMelody => "Some melodic movement detected",
            MelodyReason::FlatMelody => "Melody is not clear, this may be speaking",
        };
        f.write_str(text)
    }
}

/// Outcome of the melody-presence check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MelodyCheck {
    pub has_melody: bool,
    /// Weighted melody score in [0, 100]
    pub melody_score: f32,
    pub reason: MelodyReason,
    /// Mean relative frame-to-frame pitch change
    pub avg_change: f32,
    /// `(max - min) / min` over valid pitches
    pub relative_range: f32,
    /// `std / mean` over valid pitches
    pub relative_std_dev: f32,
}

impl MelodyCheck {
    /// Result reported when the caller disables the gate
    pub fn disabled() -> Self {
        Self {
            has_melody: true,
            melody_score: DISABLED_MELODY_SCORE,
            reason: MelodyReason::Disabled,
            avg_change: 0.0,
            relative_range: 0.0,
            relative_std_dev: 0.0,
        }
    }

    /// Result reported when the voice gate rejected the recording
    pub fn no_voice() -> Self {
        Self {
            reason: MelodyReason::NoVoice,
            ..Self::insufficient_data()
        }
    }

    pub(crate) fn insufficient_data() -> Self {
        Self {
            has_melody: false,
            melody_score: 0.0,
            reason: MelodyReason::InsufficientData,
            avg_change: 0.0,
            relative_range: 0.0,
            relative_std_dev: 0.0,
        }
    }
}

/// Detect melodic movement in a pitch history
///
/// # Arguments
/// * `pitch_history` - Detected pitches in Hz, in frame order
pub fn detect_melody(pitch_history: &[f32]) -> MelodyCheck {
    if pitch_history.len() < MIN_PITCH_HISTORY {
        log::debug!(
            "[MelodyGate] {} pitches, need {}",
            pitch_history.len(),
            MIN_PITCH_HISTORY
        );
        return MelodyCheck::insufficient_data();
    }

    let valid: Vec<f32> = pitch_history
        .iter()
        .copied()
        .filter(|&p| p > VOCAL_BAND_MIN_HZ && p < VOCAL_BAND_MAX_HZ)
        .collect();

    if valid.len() < MIN_VALID_PITCHES {
        log::debug!(
            "[MelodyGate] {} valid pitches, need {}",
            valid.len(),
            MIN_VALID_PITCHES
        );
        return MelodyCheck::insufficient_data();
    }

    let changes: Vec<f32> = valid
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs() / pair[0])
        .collect();
    let avg_change = stats::mean(&changes);

    let (min_pitch, max_pitch) = stats::min_max(&valid).unwrap_or((0.0, 0.0));
    let relative_range = if min_pitch > 0.0 {
        (max_pitch - min_pitch) / min_pitch
    } else {
        0.0
    };
    let relative_std_dev = stats::relative_std_dev(&valid, 0.0);

    let is_speaking = avg_change < CHANGE_THRESHOLD
        && relative_range < RANGE_THRESHOLD
        && relative_std_dev < STD_DEV_THRESHOLD;
    let is_singing = avg_change >= CHANGE_THRESHOLD
        && relative_range >= RANGE_THRESHOLD
        && relative_std_dev >= STD_DEV_THRESHOLD;

    let change_score = (avg_change * CHANGE_SCALE).min(100.0);
    let range_score = (relative_range * RANGE_SCALE).min(100.0);
    let std_dev_score = (relative_std_dev * STD_DEV_SCALE).min(100.0);
    let melody_score =
        change_score * CHANGE_WEIGHT + range_score * RANGE_WEIGHT + std_dev_score * STD_DEV_WEIGHT;

    let (has_melody, reason) = if is_speaking {
        (false, MelodyReason::Speaking)
    } else if is_singing {
        (true, MelodyReason::Singing)
    } else if melody_score >= MELODY_SCORE_THRESHOLD {
        (true, MelodyReason::SomeMelody)
    } else {
        (false, MelodyReason::FlatMelody)
    };

    log::debug!(
        "[MelodyGate] change={:.3} range={:.3} std={:.3} score={:.1} -> {:?}",
        avg_change,
        relative_range,
        relative_std_dev,
        melody_score,
        reason
    );

    MelodyCheck {
        has_melody,
        melody_score,
        reason,
        avg_change,
        relative_range,
        relative_std_dev,
    }
}

impl QualityGate for MelodyCheck {
    fn passed(&self) -> bool {
        self.has_melody
    }

    fn value(&self) -> f32 {
        (self.melody_score / 100.0).clamp(0.0, 1.0)
    }

    fn reason_text(&self) -> String {
        self.reason.to_string()
    }
}
