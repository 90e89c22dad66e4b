//! Configuration management for scoring runs
//!
//! The analysis switches (optional gates, frame parallelism) and the
//! capture defaults used by the CLI harness are loaded from a JSON file so
//! scoring modes can be changed without recompiling. Missing or malformed
//! files fall back to the beginner-mode defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default location of the scoring configuration
pub const DEFAULT_CONFIG_PATH: &str = "assets/scoring_config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub capture: CaptureConfig,
}

/// Switches for one analysis run
///
/// With both gates disabled the run is in "beginner mode" and the total
/// score never drops below 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Run the voice-presence gate and apply its confidence penalty
    pub voice_gate: bool,
    /// Run the melody-presence gate and apply its penalty
    pub melody_gate: bool,
    /// Extract frame features on the rayon thread pool
    pub parallel_frames: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            voice_gate: false,
            melody_gate: false,
            parallel_frames: true,
        }
    }
}

impl AnalysisConfig {
    /// Neither optional gate is enabled
    pub fn is_beginner_mode(&self) -> bool {
        !self.voice_gate && !self.melody_gate
    }
}

/// Capture defaults for synthesized and recorded fixtures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults when the file cannot be
    /// read or parsed (a warning is logged)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from [`DEFAULT_CONFIG_PATH`]
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}
