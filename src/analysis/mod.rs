// Analysis module - scoring pipeline for one vocal recording
//
// This module runs the complete analysis of a finished recording and
// produces the AnalysisResult shown to the singer.
//
// Architecture:
// - features: per-frame RMS, ZCR, power spectrum and pitch (rayon per frame)
// - gates: duration, voice-presence and melody-presence checks
// - metrics: pitch accuracy, rhythm, volume and timbre evaluators
// - composer: weighted total, uplift, floors and sequential penalties, or
//   the capped result of a voice-rejected recording
// - result: AnalysisResult and its presentation helpers
//
// The pipeline is a pure function of its inputs: no state survives a call.

pub mod composer;
pub mod features;
pub mod gates;
pub mod metrics;
pub mod result;
pub mod stats;

use crate::config::AnalysisConfig;

use features::{extract_histories, frame_size_for};
use gates::GateReport;
use metrics::MetricScores;

pub use result::{
    Advice, AnalysisDetails, AnalysisResult, AnalysisStatus, DiagnosticReason, PenaltyReason,
    ScoreLevel,
};

/// Analyze a complete recording
///
/// # Arguments
/// * `blocks` - PCM sample blocks in capture order, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Claimed recording duration in seconds
/// * `config` - Optional gate switches and frame parallelism
///
/// # Returns
/// `AnalysisResult` with status `Complete`, or `InsufficientData` with all
/// scores 0 when there is no audio or the sample rate is unusable
pub fn analyze<B: AsRef<[f32]>>(
    blocks: &[B],
    sample_rate: u32,
    duration: f32,
    config: &AnalysisConfig,
) -> AnalysisResult {
    let total_samples: usize = blocks.iter().map(|b| b.as_ref().len()).sum();
    if total_samples == 0 {
        log::warn!("[Analysis] No audio samples supplied");
        return AnalysisResult::insufficient(duration, config, DiagnosticReason::NoAudio);
    }
    if frame_size_for(sample_rate) == 0 {
        log::warn!("[Analysis] Sample rate {} Hz is too low", sample_rate);
        return AnalysisResult::insufficient(duration, config, DiagnosticReason::InvalidSampleRate);
    }

    let mut samples = Vec::with_capacity(total_samples);
    for block in blocks {
        samples.extend_from_slice(block.as_ref());
    }

    let histories = extract_histories(&samples, sample_rate, config.parallel_frames);
    let gates = GateReport::evaluate(&histories, duration, config);
    let (scores, composition) = if gates.rejects_voice() {
        composer::compose_rejected(&gates)
    } else {
        let scores = MetricScores::evaluate(&histories, duration);
        let composition = composer::compose(&scores, &gates, config);
        (scores, composition)
    };

    log::info!(
        "[Analysis] Score {} (pitch {}, rhythm {}, volume {}, timbre {}) over {} frames",
        composition.total_score,
        scores.pitch,
        scores.rhythm,
        scores.volume,
        scores.timbre,
        histories.frame_count()
    );

    AnalysisResult {
        total_score: composition.total_score,
        pitch: scores.pitch,
        rhythm: scores.rhythm,
        volume: scores.volume,
        timbre: scores.timbre,
        duration,
        gates,
        mode: *config,
        status: AnalysisStatus::Complete,
        penalty_reasons: composition.penalty_reasons,
        details: AnalysisDetails::from_histories(&histories),
    }
}

#[cfg(test)]
mod tests;
