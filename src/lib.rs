// Vocal Coach Core - recording analysis and scoring engine
// Deterministic DSP feature extraction, quality gates and score composition

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod pcm;

// Re-exports for convenience
pub use analysis::{
    analyze, Advice, AnalysisDetails, AnalysisResult, AnalysisStatus, DiagnosticReason,
    PenaltyReason, ScoreLevel,
};
pub use config::{AnalysisConfig, AppConfig};
