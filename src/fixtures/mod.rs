//! Fixture utilities for the deterministic CLI harness.
//!
//! This module discovers fixture assets, loads PCM WAV input data,
//! parses optional expectation JSON, and scores the audio through the
//! analysis pipeline. It is desktop-focused to support CI and QA workflows.

pub mod synthetic;
pub mod wav;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{analyze, AnalysisResult};
use crate::config::AnalysisConfig;
use crate::error::FixtureError;

pub use wav::{read_wav, write_wav, WavAudio};

/// Default location for fixture WAV/JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub wav_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Loaded fixture data with decoded PCM samples.
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub audio: WavAudio,
    pub expectations: Option<FixtureExpectations>,
}

/// Inclusive score range accepted for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBounds {
    #[serde(default)]
    pub min: u8,
    #[serde(default = "default_max_score")]
    pub max: u8,
}

fn default_max_score() -> u8 {
    100
}

impl ScoreBounds {
    pub fn contains(&self, score: u8) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

/// JSON expectation schema for fixture verification.
///
/// Every bound is optional; only the listed fields are checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureExpectations {
    #[serde(default)]
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Claimed duration to score with (defaults to the audio length)
    #[serde(default)]
    pub duration: Option<f32>,
    /// Analysis switches to score with (defaults to the caller's config)
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
    #[serde(default)]
    pub total_score: Option<ScoreBounds>,
    #[serde(default)]
    pub pitch: Option<ScoreBounds>,
    #[serde(default)]
    pub rhythm: Option<ScoreBounds>,
    #[serde(default)]
    pub volume: Option<ScoreBounds>,
    #[serde(default)]
    pub timbre: Option<ScoreBounds>,
    #[serde(default)]
    pub is_voice: Option<bool>,
    #[serde(default)]
    pub has_melody: Option<bool>,
}

impl FixtureExpectations {
    pub fn verify(&self, actual: &AnalysisResult) -> Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        let scores = [
            ("total_score", self.total_score, actual.total_score),
            ("pitch", self.pitch, actual.pitch),
            ("rhythm", self.rhythm, actual.rhythm),
            ("volume", self.volume, actual.volume),
            ("timbre", self.timbre, actual.timbre),
        ];
        for (field, bounds, score) in scores {
            if let Some(bounds) = bounds {
                if !bounds.contains(score) {
                    failures.push(ExpectationFailure {
                        field: field.to_string(),
                        expected: format!("{}..={}", bounds.min, bounds.max),
                        actual: score.to_string(),
                    });
                }
            }
        }

        let flags = [
            ("is_voice", self.is_voice, actual.gates.voice.is_voice),
            ("has_melody", self.has_melody, actual.gates.melody.has_melody),
        ];
        for (field, expected, value) in flags {
            if let Some(expected) = expected {
                if expected != value {
                    failures.push(ExpectationFailure {
                        field: field.to_string(),
                        expected: expected.to_string(),
                        actual: value.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing actual results with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "field": failure.field,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationFailure {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>, FixtureError> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        let io_error = |err: std::io::Error| FixtureError::NotFound {
            fixture: err.to_string(),
            root: self.root.display().to_string(),
        };

        for entry in fs::read_dir(&self.root).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("wav") {
                fixtures.push(metadata_for_path(&path));
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load fixture samples + expectations for provided name or path.
    pub fn load(
        &self,
        fixture: &str,
        override_expect: Option<PathBuf>,
    ) -> Result<FixtureData, FixtureError> {
        let wav_path = self.resolve_fixture_path(fixture)?;
        let metadata = metadata_for_path(&wav_path);
        let audio = read_wav(&wav_path)?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => Some(load_expectations(&path)?),
            None => None,
        };

        Ok(FixtureData {
            metadata,
            audio,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf, FixtureError> {
        let as_path = Path::new(fixture);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}.wav"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(FixtureError::NotFound {
                fixture: fixture.to_string(),
                root: self.root.display().to_string(),
            })
        }
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

fn metadata_for_path(wav_path: &Path) -> FixtureMetadata {
    let name = wav_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let expect_path = wav_path.with_extension("expect.json");
    FixtureMetadata {
        name,
        wav_path: wav_path.to_path_buf(),
        expect_path: expect_path.is_file().then_some(expect_path),
    }
}

/// Read and parse an expectation JSON document
pub fn load_expectations(path: &Path) -> Result<FixtureExpectations, FixtureError> {
    let expectation_error = |reason: String| FixtureError::Expectation {
        path: path.display().to_string(),
        reason,
    };
    let json = fs::read_to_string(path).map_err(|err| expectation_error(err.to_string()))?;
    serde_json::from_str(&json).map_err(|err| expectation_error(err.to_string()))
}

/// Scores fixture audio through the analysis pipeline.
pub struct FixtureScorer {
    config: AnalysisConfig,
}

impl FixtureScorer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Score a loaded fixture
    ///
    /// Duration and config from the fixture's expectations override the
    /// scorer defaults; otherwise the audio length is the claimed duration.
    pub fn run(&self, data: &FixtureData) -> AnalysisResult {
        let expectations = data.expectations.as_ref();
        let duration = expectations
            .and_then(|e| e.duration)
            .unwrap_or_else(|| data.audio.duration_secs());
        let config = expectations.and_then(|e| e.config).unwrap_or(self.config);

        self.score(&data.audio, duration, &config)
    }

    /// Score decoded audio with an explicit duration and config
    pub fn score(&self, audio: &WavAudio, duration: f32, config: &AnalysisConfig) -> AnalysisResult {
        analyze(&[audio.samples.as_slice()], audio.sample_rate, duration, config)
    }
}

impl Default for FixtureScorer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}
