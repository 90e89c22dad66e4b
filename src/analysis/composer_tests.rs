use super::*;
use crate::analysis::gates::{
    check_duration, DurationReason, MelodyCheck, MelodyReason, VoiceCheck, VoiceReason,
};

fn uniform(score: u8) -> MetricScores {
    MetricScores {
        pitch: score,
        rhythm: score,
        volume: score,
        timbre: score,
    }
}

fn gates(duration: f32) -> GateReport {
    GateReport {
        duration: check_duration(duration),
        voice: VoiceCheck::disabled(),
        melody: MelodyCheck::disabled(),
    }
}

fn config(voice_gate: bool, melody_gate: bool) -> AnalysisConfig {
    AnalysisConfig {
        voice_gate,
        melody_gate,
        ..AnalysisConfig::default()
    }
}

fn with_voice_confidence(mut report: GateReport, confidence: f32) -> GateReport {
    report.voice = VoiceCheck {
        is_voice: false,
        confidence,
        reason: VoiceReason::NoPitch,
        ..VoiceCheck::disabled()
    };
    report
}

fn with_melody(mut report: GateReport, has_melody: bool, score: f32, reason: MelodyReason) -> GateReport {
    report.melody = MelodyCheck {
        has_melody,
        melody_score: score,
        reason,
        ..MelodyCheck::disabled()
    };
    report
}

#[test]
fn test_silent_recording_hits_floor() {
    let scores = MetricScores {
        pitch: 45,
        rhythm: 50,
        volume: 12,
        timbre: 69,
    };
    // base 43, +15 uplift = 58, floored to 65
    let composition = compose(&scores, &gates(60.0), &config(false, false));
    assert_eq!(composition.total_score, 65);
    assert!(composition.penalty_reasons.is_empty());
}

#[test]
fn test_uplift_bands() {
    assert_eq!(uplift(90.0), 5.0);
    assert_eq!(uplift(85.0), 5.0);
    assert_eq!(uplift(75.0), 10.0);
    assert_eq!(uplift(50.0), 18.0);
    assert_eq!(uplift(45.0), 15.0);
    assert_eq!(uplift(39.9), 12.0);
}

#[test]
fn test_strong_scores() {
    let composition = compose(&uniform(90), &gates(60.0), &config(false, false));
    assert_eq!(composition.total_score, 95);
}

#[test]
fn test_average_of_fifty_is_floored_to_seventy() {
    // base 50 + 18 = 68 < 70 with average >= 45
    let composition = compose(&uniform(50), &gates(60.0), &config(false, false));
    assert_eq!(composition.total_score, 70);
}

#[test]
fn test_beginner_floor_only_without_gates() {
    let beginner = compose(&uniform(20), &gates(60.0), &config(false, false));
    assert_eq!(beginner.total_score, 60);

    let report = with_voice_confidence(gates(60.0), 0.9);
    let advanced = compose(&uniform(20), &report, &config(true, false));
    assert_eq!(advanced.total_score, 32);
    assert!(advanced.penalty_reasons.is_empty());
}

#[test]
fn test_low_voice_confidence_penalty() {
    let report = with_voice_confidence(gates(60.0), 0.2);
    let composition = compose(&uniform(90), &report, &config(true, false));

    // 95 * (0.5 + 0.5 * 0.2)
    assert_eq!(composition.total_score, 57);
    assert_eq!(composition.penalty_reasons, vec![PenaltyReason::LowVoiceConfidence]);
}

#[test]
fn test_voice_confidence_ignored_when_gate_disabled() {
    let report = with_voice_confidence(gates(60.0), 0.2);
    let composition = compose(&uniform(90), &report, &config(false, false));
    assert_eq!(composition.total_score, 95);
}

#[test]
fn test_duration_penalty_is_attenuated_and_capped() {
    let short = compose(&uniform(90), &gates(12.0), &config(false, false));
    // 0.12 * 0.4 = 4.8%
    assert_eq!(short.total_score, 90);
    assert_eq!(
        short.penalty_reasons,
        vec![PenaltyReason::Duration(DurationReason::SlightlyShort)]
    );

    let invalid = compose(&uniform(90), &gates(0.0), &config(false, false));
    // capped at 15%: 95 * 0.85 = 80.75
    assert_eq!(invalid.total_score, 81);
}

#[test]
fn test_missing_melody_penalty() {
    let report = with_melody(gates(60.0), false, 0.0, MelodyReason::InsufficientData);
    let composition = compose(&uniform(90), &report, &config(false, true));

    assert_eq!(composition.total_score, 81);
    assert_eq!(
        composition.penalty_reasons,
        vec![PenaltyReason::NoMelody(MelodyReason::InsufficientData)]
    );
}

#[test]
fn test_missing_melody_never_raises_score() {
    let report = with_melody(gates(60.0), false, 45.0, MelodyReason::Speaking);
    let composition = compose(&uniform(90), &report, &config(false, true));
    assert_eq!(composition.total_score, 95);
}

#[test]
fn test_weak_melody_penalty() {
    let report = with_melody(gates(60.0), true, 40.0, MelodyReason::SomeMelody);
    let composition = compose(&uniform(90), &report, &config(false, true));

    // 1% off 95
    assert_eq!(composition.total_score, 94);
    assert_eq!(composition.penalty_reasons, vec![PenaltyReason::WeakMelody]);
}

#[test]
fn test_disabled_melody_gate_has_no_penalty() {
    let composition = compose(&uniform(90), &gates(60.0), &config(true, false));
    assert_eq!(composition.total_score, 95);
}

#[test]
fn test_penalties_compound_in_order() {
    let report = with_voice_confidence(gates(0.0), 0.2);
    let composition = compose(&uniform(90), &report, &config(true, false));

    // 95 -> 57 -> 57 * 0.85 = 48.45
    assert_eq!(composition.total_score, 48);
    assert_eq!(
        composition.penalty_reasons,
        vec![
            PenaltyReason::LowVoiceConfidence,
            PenaltyReason::Duration(DurationReason::Invalid)
        ]
    );
}

fn rejected(duration: f32, confidence: f32) -> GateReport {
    let mut report = gates(duration);
    report.voice = VoiceCheck {
        is_voice: false,
        confidence,
        reason: VoiceReason::MissingHarmonics,
        ..VoiceCheck::disabled()
    };
    report.melody = MelodyCheck::no_voice();
    report
}

#[test]
fn test_rejected_voice_caps_total() {
    // round(0.8 * 30) = 24, metric shares 0.8 / 0.9 / 0.7 / 0.6
    let (scores, composition) = compose_rejected(&rejected(60.0, 0.8));
    assert_eq!(composition.total_score, 24);
    assert_eq!(
        scores,
        MetricScores {
            pitch: 19,
            rhythm: 22,
            volume: 17,
            timbre: 14,
        }
    );
    assert_eq!(
        composition.penalty_reasons,
        vec![PenaltyReason::NotVoice(VoiceReason::MissingHarmonics)]
    );
}

#[test]
fn test_rejected_voice_ignores_confidence_threshold() {
    // Confidence above the low-confidence threshold still caps the total
    let (_, composition) = compose_rejected(&rejected(60.0, 0.9));
    assert_eq!(composition.total_score, 27);

    let (_, composition) = compose_rejected(&rejected(60.0, 0.42));
    assert_eq!(composition.total_score, 13);
}

#[test]
fn test_rejected_voice_takes_full_duration_penalty() {
    // 24 * (1 - 0.35) = 15.6
    let (_, composition) = compose_rejected(&rejected(5.0, 0.8));
    assert_eq!(composition.total_score, 16);
    assert_eq!(
        composition.penalty_reasons,
        vec![
            PenaltyReason::NotVoice(VoiceReason::MissingHarmonics),
            PenaltyReason::Duration(DurationReason::TooShort),
        ]
    );
}
