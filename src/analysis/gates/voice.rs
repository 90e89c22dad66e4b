// VoiceGate - decides whether a recording contains a singing/speaking voice
//
// Each analysis frame is classified from its RMS, ZCR and pitch estimate:
// - silent: RMS below SILENCE_RMS, skipped but still counted
// - pitched: pitch inside the vocal band [80, 1000] Hz
// - voice-like: pitched and ZCR inside [0.05, 0.15]
// - harmonic: pitched and at least one 2x..5x harmonic above 30% power
//
// The ratios over all frames feed both the accept/reject decision and a
// weighted confidence in [0, 1].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::QualityGate;
use crate::analysis::features::pitch::in_vocal_band;
use crate::analysis::features::FeatureHistories;

/// Fewer frames than this cannot be judged
pub const MIN_FRAMES: usize = 5;
/// Frames quieter than this RMS are treated as silence
pub const SILENCE_RMS: f32 = 0.01;
/// Lower bound of the voice ZCR band
pub const VOICE_ZCR_MIN: f32 = 0.05;
/// Upper bound of the voice ZCR band
pub const VOICE_ZCR_MAX: f32 = 0.15;
/// Minimum share of pitched frames
pub const MIN_PITCH_RATIO: f32 = 0.3;
/// Minimum share of voice-like frames
pub const MIN_VOICE_FRAME_RATIO: f32 = 0.2;
/// Minimum share of harmonic frames
pub const MIN_HARMONIC_RATIO: f32 = 0.15;

const PITCH_WEIGHT: f32 = 0.3;
const VOICE_FRAME_WEIGHT: f32 = 0.3;
const HARMONIC_WEIGHT: f32 = 0.2;
const ZCR_BAND_WEIGHT: f32 = 0.2;

/// Why the voice gate accepted or rejected the recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceReason {
    /// Gate switched off by the caller
    Disabled,
    /// Fewer than [`MIN_FRAMES`] frames
    InsufficientData,
    /// Too few frames carry a vocal-band pitch
    NoPitch,
    /// Too few pitched frames have a voice-like ZCR
    WeakVoiceFeatures,
    /// Mean ZCR outside the voice band
    ZcrOutOfRange,
    /// Too few frames show harmonic structure
    MissingHarmonics,
    /// All criteria met
    VoiceDetected,
}

impl fmt::Display for VoiceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            VoiceReason::Disabled => "Voice detection disabled",
            VoiceReason::InsufficientData => "Recording too short to detect a voice",
            VoiceReason::NoPitch => "No vocal pitch detected",
            VoiceReason::WeakVoiceFeatures => "Voice characteristics are weak",
            VoiceReason::ZcrOutOfRange => "Audio texture does not match a voice",
            VoiceReason::MissingHarmonics => "Missing the harmonic structure of a voice",
            VoiceReason::VoiceDetected => "Voice detected",
        };
        f.write_str(text)
    }
}

/// Outcome of the voice-presence check
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceCheck {
    pub is_voice: bool,
    /// Weighted confidence in [0, 1]
    pub confidence: f32,
    pub reason: VoiceReason,
    /// Share of frames with a vocal-band pitch
    pub pitch_ratio: f32,
    /// Share of frames that are pitched with a voice-like ZCR
    pub voice_frame_ratio: f32,
    /// Share of frames that are pitched with harmonic support
    pub harmonic_ratio: f32,
    /// ZCR of non-silent frames summed, divided by all frames
    pub mean_zcr: f32,
}

impl VoiceCheck {
    /// Result reported when the caller disables the gate
    pub fn disabled() -> Self {
        Self {
            is_voice: true,
            confidence: 1.0,
            reason: VoiceReason::Disabled,
            pitch_ratio: 0.0,
            voice_frame_ratio: 0.0,
            harmonic_ratio: 0.0,
            mean_zcr: 0.0,
        }
    }

    pub(crate) fn insufficient_data() -> Self {
        Self {
            is_voice: false,
            confidence: 0.0,
            reason: VoiceReason::InsufficientData,
            pitch_ratio: 0.0,
            voice_frame_ratio: 0.0,
            harmonic_ratio: 0.0,
            mean_zcr: 0.0,
        }
    }
}

fn zcr_in_voice_band(zcr: f32) -> bool {
    (VOICE_ZCR_MIN..=VOICE_ZCR_MAX).contains(&zcr)
}

/// Classify the recording as voice or non-voice
///
/// # Arguments
/// * `histories` - Per-frame features of the whole recording
pub fn detect_voice(histories: &FeatureHistories) -> VoiceCheck {
    let frame_count = histories.frame_count();
    if frame_count < MIN_FRAMES {
        log::debug!(
            "[VoiceGate] Only {} frames, need {}",
            frame_count,
            MIN_FRAMES
        );
        return VoiceCheck::insufficient_data();
    }

    let mut pitched = 0usize;
    let mut voice_like = 0usize;
    let mut harmonic = 0usize;
    let mut zcr_total = 0.0f32;

    let frames = histories
        .rms_history()
        .iter()
        .zip(histories.zcr_history())
        .zip(histories.frame_pitches());

    for ((&rms, &zcr), pitch) in frames {
        if rms < SILENCE_RMS {
            continue;
        }
        zcr_total += zcr;

        if !in_vocal_band(pitch.frequency) {
            continue;
        }
        pitched += 1;
        if pitch.harmonic_evidence > 0 {
            harmonic += 1;
        }
        if zcr_in_voice_band(zcr) {
            voice_like += 1;
        }
    }

    let total = frame_count as f32;
    let pitch_ratio = pitched as f32 / total;
    let voice_frame_ratio = voice_like as f32 / total;
    let harmonic_ratio = harmonic as f32 / total;
    let mean_zcr = zcr_total / total;
    let zcr_ok = zcr_in_voice_band(mean_zcr);

    let is_voice = pitch_ratio >= MIN_PITCH_RATIO
        && voice_frame_ratio >= MIN_VOICE_FRAME_RATIO
        && zcr_ok
        && harmonic_ratio >= MIN_HARMONIC_RATIO;

    let confidence = (pitch_ratio * PITCH_WEIGHT
        + voice_frame_ratio * VOICE_FRAME_WEIGHT
        + harmonic_ratio * HARMONIC_WEIGHT
        + if zcr_ok { ZCR_BAND_WEIGHT } else { 0.0 })
    .clamp(0.0, 1.0);

    let reason = if is_voice {
        VoiceReason::VoiceDetected
    } else if pitch_ratio < MIN_PITCH_RATIO {
        VoiceReason::NoPitch
    } else if voice_frame_ratio < MIN_VOICE_FRAME_RATIO {
        VoiceReason::WeakVoiceFeatures
    } else if !zcr_ok {
        VoiceReason::ZcrOutOfRange
    } else {
        VoiceReason::MissingHarmonics
    };

    log::debug!(
        "[VoiceGate] pitch={:.2} voice={:.2} harmonic={:.2} zcr={:.3} -> {:?} (confidence {:.2})",
        pitch_ratio,
        voice_frame_ratio,
        harmonic_ratio,
        mean_zcr,
        reason,
        confidence
    );

    VoiceCheck {
        is_voice,
        confidence,
        reason,
        pitch_ratio,
        voice_frame_ratio,
        harmonic_ratio,
        mean_zcr,
    }
}

impl QualityGate for VoiceCheck {
    fn passed(&self) -> bool {
        self.is_voice
    }

    fn value(&self) -> f32 {
        self.confidence
    }

    fn reason_text(&self) -> String {
        self.reason.to_string()
    }
}
