use super::*;
use crate::fixtures::synthetic;

const SAMPLE_RATE: u32 = 16000;

fn beginner() -> AnalysisConfig {
    AnalysisConfig::default()
}

#[test]
fn test_empty_input_is_insufficient() {
    let blocks: Vec<Vec<f32>> = Vec::new();
    let result = analyze(&blocks, SAMPLE_RATE, 30.0, &beginner());

    assert_eq!(
        result.status,
        AnalysisStatus::InsufficientData {
            reason: DiagnosticReason::NoAudio
        }
    );
    assert_eq!(result.total_score, 0);
    assert!(result.details.rms_history.is_empty());

    let empty_blocks = vec![Vec::<f32>::new(), Vec::new()];
    assert!(!analyze(&empty_blocks, SAMPLE_RATE, 30.0, &beginner()).is_complete());
}

#[test]
fn test_tiny_sample_rate_is_insufficient() {
    let result = analyze(&[vec![0.1f32; 100]], 5, 20.0, &beginner());
    assert_eq!(
        result.status,
        AnalysisStatus::InsufficientData {
            reason: DiagnosticReason::InvalidSampleRate
        }
    );
}

#[test]
fn test_block_boundaries_do_not_matter() {
    let samples = synthetic::sweep(SAMPLE_RATE, 220.0, 330.0, 0.4, SAMPLE_RATE as usize * 12);
    let whole = analyze(&[samples.as_slice()], SAMPLE_RATE, 12.0, &beginner());

    let blocks: Vec<&[f32]> = samples.chunks(1234).collect();
    let chunked = analyze(&blocks, SAMPLE_RATE, 12.0, &beginner());

    assert_eq!(whole, chunked);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let samples = synthetic::vibrato(SAMPLE_RATE, 330.0, 0.03, 5.5, 0.4, SAMPLE_RATE as usize * 10);
    let parallel = analyze(&[&samples], SAMPLE_RATE, 10.0, &beginner());
    let sequential = analyze(
        &[&samples],
        SAMPLE_RATE,
        10.0,
        &AnalysisConfig {
            parallel_frames: false,
            ..beginner()
        },
    );

    assert_eq!(parallel.total_score, sequential.total_score);
    assert_eq!(parallel.details, sequential.details);
    assert_eq!(parallel.gates, sequential.gates);
}

#[test]
fn test_result_records_mode_and_details() {
    let config = AnalysisConfig {
        voice_gate: true,
        melody_gate: true,
        parallel_frames: true,
    };
    let samples = synthetic::sine(SAMPLE_RATE, 440.0, 0.4, SAMPLE_RATE as usize * 15);
    let result = analyze(&[samples], SAMPLE_RATE, 15.0, &config);

    assert!(result.is_complete());
    assert_eq!(result.mode, config);
    assert_eq!(result.details.rms_history.len(), 100);
    assert!(result.details.average_pitch > 400.0 && result.details.average_pitch < 480.0);
    // A harmonic-free tone is rejected but still reports its details
    assert!(result.gates.rejects_voice());
    assert_eq!(result.total_score, 24);
}

#[test]
fn test_steady_tone_melody_gate_reports_speaking() {
    let config = AnalysisConfig {
        melody_gate: true,
        ..beginner()
    };
    let samples = synthetic::sine(SAMPLE_RATE, 300.0, 0.4, SAMPLE_RATE as usize * 30);
    let result = analyze(&[samples], SAMPLE_RATE, 30.0, &config);

    assert!(!result.gates.melody.has_melody);
    assert_eq!(result.gates.melody.reason, gates::MelodyReason::Speaking);
    assert!(result
        .penalty_reasons
        .contains(&PenaltyReason::NoMelody(gates::MelodyReason::Speaking)));
}
