//! Analysis result handed to the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::features::FeatureHistories;
use super::gates::{
    check_duration, DurationReason, GateReport, MelodyCheck, MelodyReason, VoiceCheck, VoiceReason,
};
use super::metrics::MetricScores;
use super::stats;
use crate::config::AnalysisConfig;

/// Histories in [`AnalysisDetails`] keep at most this many leading entries
pub const DETAILS_HISTORY_LIMIT: usize = 100;

/// Metric scores below this produce a practice suggestion
pub const ADVICE_THRESHOLD: u8 = 70;

/// Why an analysis could not run the full pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    /// No PCM samples were supplied
    NoAudio,
    /// Sample rate too low for a single-sample analysis frame
    InvalidSampleRate,
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticReason::NoAudio => f.write_str("No audio data was captured"),
            DiagnosticReason::InvalidSampleRate => f.write_str("Sample rate is too low to analyze"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AnalysisStatus {
    Complete,
    InsufficientData { reason: DiagnosticReason },
}

/// A score reduction applied by the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum PenaltyReason {
    /// The enabled voice gate rejected the recording
    NotVoice(VoiceReason),
    LowVoiceConfidence,
    Duration(DurationReason),
    NoMelody(MelodyReason),
    WeakMelody,
}

impl fmt::Display for PenaltyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyReason::NotVoice(reason) => write!(f, "{}", reason),
            PenaltyReason::LowVoiceConfidence => f.write_str("Low voice confidence"),
            PenaltyReason::Duration(reason) => write!(f, "{}", reason),
            PenaltyReason::NoMelody(reason) => write!(f, "{}", reason),
            PenaltyReason::WeakMelody => f.write_str("Weak melody"),
        }
    }
}

/// Raw data kept for charts in the result view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisDetails {
    /// Mean detected pitch in Hz, 0.0 when nothing was pitched
    pub average_pitch: f32,
    pub pitch_history: Vec<f32>,
    pub rms_history: Vec<f32>,
    pub zcr_history: Vec<f32>,
}

impl AnalysisDetails {
    pub fn from_histories(histories: &FeatureHistories) -> Self {
        let head = |values: &[f32]| -> Vec<f32> {
            values.iter().take(DETAILS_HISTORY_LIMIT).copied().collect()
        };
        Self {
            average_pitch: stats::mean(histories.pitch_history()),
            pitch_history: head(histories.pitch_history()),
            rms_history: head(histories.rms_history()),
            zcr_history: head(histories.zcr_history()),
        }
    }
}

/// Grade band of a total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    NeedsWork,
    Pass,
    Fair,
    Good,
    Excellent,
}

impl ScoreLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => ScoreLevel::Excellent,
            80..=89 => ScoreLevel::Good,
            70..=79 => ScoreLevel::Fair,
            60..=69 => ScoreLevel::Pass,
            _ => ScoreLevel::NeedsWork,
        }
    }
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ScoreLevel::Excellent => "Excellent",
            ScoreLevel::Good => "Good",
            ScoreLevel::Fair => "Fair",
            ScoreLevel::Pass => "Pass",
            ScoreLevel::NeedsWork => "Needs work",
        };
        f.write_str(text)
    }
}

/// Practice suggestion derived from weak metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    PracticePitch,
    PracticeRhythm,
    PracticeBreathControl,
    PracticeResonance,
    KeepGoing,
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Advice::PracticePitch => "Practice holding steady notes to improve pitch accuracy",
            Advice::PracticeRhythm => "Sing along with a metronome to steady the rhythm",
            Advice::PracticeBreathControl => "Work on breath support for a more even volume",
            Advice::PracticeResonance => "Try resonance exercises for a fuller tone",
            Advice::KeepGoing => "Great work, keep practicing",
        };
        f.write_str(text)
    }
}

/// Scored outcome of one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_score: u8,
    pub pitch: u8,
    pub rhythm: u8,
    pub volume: u8,
    pub timbre: u8,
    /// Claimed duration in seconds
    pub duration: f32,
    pub gates: GateReport,
    pub mode: AnalysisConfig,
    pub status: AnalysisStatus,
    pub penalty_reasons: Vec<PenaltyReason>,
    pub details: AnalysisDetails,
}

impl AnalysisResult {
    /// Result for input the pipeline cannot analyze; every score is 0
    pub fn insufficient(duration: f32, config: &AnalysisConfig, reason: DiagnosticReason) -> Self {
        let voice = if config.voice_gate {
            VoiceCheck::insufficient_data()
        } else {
            VoiceCheck::disabled()
        };
        let melody = if config.melody_gate {
            MelodyCheck::insufficient_data()
        } else {
            MelodyCheck::disabled()
        };

        Self {
            total_score: 0,
            pitch: 0,
            rhythm: 0,
            volume: 0,
            timbre: 0,
            duration,
            gates: GateReport {
                duration: check_duration(duration),
                voice,
                melody,
            },
            mode: *config,
            status: AnalysisStatus::InsufficientData { reason },
            penalty_reasons: Vec::new(),
            details: AnalysisDetails::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == AnalysisStatus::Complete
    }

    pub fn metric_scores(&self) -> MetricScores {
        MetricScores {
            pitch: self.pitch,
            rhythm: self.rhythm,
            volume: self.volume,
            timbre: self.timbre,
        }
    }

    pub fn level(&self) -> ScoreLevel {
        ScoreLevel::from_score(self.total_score)
    }

    /// One suggestion per metric below [`ADVICE_THRESHOLD`], or `KeepGoing`
    pub fn advice(&self) -> Vec<Advice> {
        let weak = [
            (self.pitch, Advice::PracticePitch),
            (self.rhythm, Advice::PracticeRhythm),
            (self.volume, Advice::PracticeBreathControl),
            (self.timbre, Advice::PracticeResonance),
        ];
        let advice: Vec<Advice> = weak
            .into_iter()
            .filter(|&(score, _)| score < ADVICE_THRESHOLD)
            .map(|(_, advice)| advice)
            .collect();

        if advice.is_empty() {
            vec![Advice::KeepGoing]
        } else {
            advice
        }
    }
}
