// ScoreComposer - folds metric scores and gate outcomes into the total score
//
// Stages run strictly in order and the running score is rounded to an
// integer after each one:
// 1. weighted base score
// 2. confidence uplift keyed on the unweighted metric average
// 3. floor enforcement
// 4. voice-confidence penalty (voice gate enabled)
// 5. attenuated duration penalty
// 6. melody penalty (melody gate enabled)
// 7. mode-dependent clamp (beginner mode never reports below 60)
//
// Penalties are multiplicative on the already reduced score, so their
// order changes the outcome.
//
// A recording the enabled voice gate rejects skips the stages above: its
// total is capped at REJECTED_MAX_SCORE scaled by voice confidence, and
// the metric scores are derived from that total.

use crate::analysis::gates::melody::MELODY_SCORE_THRESHOLD;
use crate::analysis::gates::GateReport;
use crate::analysis::metrics::MetricScores;
use crate::analysis::result::PenaltyReason;
use crate::analysis::stats;
use crate::config::AnalysisConfig;

const PITCH_WEIGHT: f32 = 0.3;
const RHYTHM_WEIGHT: f32 = 0.25;
const VOLUME_WEIGHT: f32 = 0.25;
const TIMBRE_WEIGHT: f32 = 0.2;

/// Uplift by metric average: `(minimum average, points)`, highest band first
pub const UPLIFT_BANDS: [(f32, f32); 4] = [(85.0, 5.0), (70.0, 10.0), (50.0, 18.0), (40.0, 15.0)];
/// Uplift for averages below every band
pub const MIN_UPLIFT: f32 = 12.0;

/// Score floors: `(floor, minimum average)`, checked in order
pub const SCORE_FLOORS: [(f32, f32); 2] = [(70.0, 45.0), (65.0, 40.0)];

/// Voice confidence below this reduces the score
pub const VOICE_CONFIDENCE_THRESHOLD: f32 = 0.7;
/// Share of the score kept at zero voice confidence
pub const VOICE_PENALTY_BASE: f32 = 0.5;
/// Fraction of the duration penalty that is applied
pub const DURATION_PENALTY_SCALE: f32 = 0.4;
/// Cap on the applied duration penalty
pub const MAX_DURATION_PENALTY: f32 = 0.15;
/// Cap on the penalty for a missing melody
pub const MAX_MELODY_PENALTY: f32 = 0.15;
/// Cap on the penalty for a weak melody
pub const MAX_WEAK_MELODY_PENALTY: f32 = 0.05;
/// Melody scores below this are penalized when a melody is present
pub const WEAK_MELODY_SCORE: f32 = 50.0;
/// Lowest total score reported in beginner mode
pub const BEGINNER_FLOOR: f32 = 60.0;

/// Total score of a voice-rejected recording at full confidence
pub const REJECTED_MAX_SCORE: f32 = 30.0;
const REJECTED_PITCH_RATIO: f32 = 0.8;
const REJECTED_RHYTHM_RATIO: f32 = 0.9;
const REJECTED_VOLUME_RATIO: f32 = 0.7;
const REJECTED_TIMBRE_RATIO: f32 = 0.6;

/// Total score plus the penalties that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub total_score: u8,
    pub penalty_reasons: Vec<PenaltyReason>,
}

/// Points added to the base score for a given metric average
fn uplift(average: f32) -> f32 {
    UPLIFT_BANDS
        .iter()
        .find(|&&(min_average, _)| average >= min_average)
        .map_or(MIN_UPLIFT, |&(_, points)| points)
}

fn enforce_floor(score: f32, average: f32) -> f32 {
    SCORE_FLOORS
        .iter()
        .find(|&&(floor, min_average)| score < floor && average >= min_average)
        .map_or(score, |&(floor, _)| floor)
}

fn apply_penalty(score: f32, penalty: f32) -> f32 {
    (score * (1.0 - penalty)).round()
}

/// Compose the total score of one recording
///
/// # Arguments
/// * `scores` - The four metric scores
/// * `gates` - Outcomes of the duration, voice and melody gates
/// * `config` - Which optional gates are enabled
pub fn compose(scores: &MetricScores, gates: &GateReport, config: &AnalysisConfig) -> Composition {
    let average = scores.average();
    let mut penalty_reasons = Vec::new();

    let base = (scores.pitch as f32 * PITCH_WEIGHT
        + scores.rhythm as f32 * RHYTHM_WEIGHT
        + scores.volume as f32 * VOLUME_WEIGHT
        + scores.timbre as f32 * TIMBRE_WEIGHT)
        .round();
    let mut score = enforce_floor((base + uplift(average)).round(), average);

    log::debug!(
        "[Composer] base {} (average {:.1}) -> {} after uplift and floor",
        base,
        average,
        score
    );

    if config.voice_gate && gates.voice.confidence < VOICE_CONFIDENCE_THRESHOLD {
        let penalty =
            1.0 - (VOICE_PENALTY_BASE + gates.voice.confidence * (1.0 - VOICE_PENALTY_BASE));
        score = apply_penalty(score, penalty);
        penalty_reasons.push(PenaltyReason::LowVoiceConfidence);
        log::warn!(
            "[Composer] Low voice confidence {:.2}, score reduced by {:.1}% to {}",
            gates.voice.confidence,
            penalty * 100.0,
            score
        );
    }

    if gates.duration.penalty > 0.0 {
        let penalty = (gates.duration.penalty * DURATION_PENALTY_SCALE).min(MAX_DURATION_PENALTY);
        score = apply_penalty(score, penalty);
        penalty_reasons.push(PenaltyReason::Duration(gates.duration.reason));
        log::warn!(
            "[Composer] {}, score reduced by {:.1}% to {}",
            gates.duration.reason,
            penalty * 100.0,
            score
        );
    }

    if config.melody_gate {
        let melody = &gates.melody;
        if !melody.has_melody {
            let penalty = ((MELODY_SCORE_THRESHOLD - melody.melody_score) / MELODY_SCORE_THRESHOLD
                * MAX_MELODY_PENALTY)
                .min(MAX_MELODY_PENALTY)
                .max(0.0);
            score = apply_penalty(score, penalty);
            penalty_reasons.push(PenaltyReason::NoMelody(melody.reason));
            log::warn!(
                "[Composer] {}, score reduced by {:.1}% to {}",
                melody.reason,
                penalty * 100.0,
                score
            );
        } else if melody.melody_score < WEAK_MELODY_SCORE {
            let penalty = ((WEAK_MELODY_SCORE - melody.melody_score) / WEAK_MELODY_SCORE
                * MAX_WEAK_MELODY_PENALTY)
                .min(MAX_WEAK_MELODY_PENALTY);
            score = apply_penalty(score, penalty);
            penalty_reasons.push(PenaltyReason::WeakMelody);
            log::warn!(
                "[Composer] Weak melody ({:.1}), score reduced by {:.1}% to {}",
                melody.melody_score,
                penalty * 100.0,
                score
            );
        }
    }

    let total = if config.is_beginner_mode() {
        score.clamp(BEGINNER_FLOOR, 100.0)
    } else {
        score.clamp(0.0, 100.0)
    };

    Composition {
        total_score: total as u8,
        penalty_reasons,
    }
}

/// Compose the result of a recording the voice gate rejected
///
/// The total is `REJECTED_MAX_SCORE * confidence`, reduced by the full
/// (unattenuated) duration penalty. Metric scores are fixed fractions of
/// that total.
///
/// # Returns
/// The derived metric scores and the composition
pub fn compose_rejected(gates: &GateReport) -> (MetricScores, Composition) {
    let voice = &gates.voice;
    let duration = &gates.duration;

    let capped = (voice.confidence * REJECTED_MAX_SCORE).round();
    let total = stats::round_score(capped * (1.0 - duration.penalty));
    let share = |ratio: f32| stats::round_score(total as f32 * ratio);
    let scores = MetricScores {
        pitch: share(REJECTED_PITCH_RATIO),
        rhythm: share(REJECTED_RHYTHM_RATIO),
        volume: share(REJECTED_VOLUME_RATIO),
        timbre: share(REJECTED_TIMBRE_RATIO),
    };

    let mut penalty_reasons = vec![PenaltyReason::NotVoice(voice.reason)];
    if duration.penalty > 0.0 {
        penalty_reasons.push(PenaltyReason::Duration(duration.reason));
    }

    log::warn!(
        "[Composer] Voice gate rejected the recording ({}, confidence {:.2}), score {}",
        voice.reason,
        voice.confidence,
        total
    );

    (
        scores,
        Composition {
            total_score: total,
            penalty_reasons,
        },
    )
}

#[cfg(test)]
#[path = "composer_tests.rs"]
mod tests;
