use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use vocal_coach::config::AppConfig;
use vocal_coach::error::log_fixture_error;
use vocal_coach::fixtures::synthetic::{SyntheticPattern, SyntheticSpec};
use vocal_coach::fixtures::wav::{read_wav, write_wav};
use vocal_coach::fixtures::{ExpectationDiff, FixtureCatalog, FixtureScorer, WavAudio};
use vocal_coach::AnalysisResult;

#[derive(Parser, Debug)]
#[command(
    name = "vocal_cli",
    about = "Deterministic scoring harness for Vocal Coach recordings"
)]
struct Cli {
    /// Override directory containing fixture assets (defaults to the crate fixtures/ dir)
    #[arg(long, global = true)]
    fixtures_dir: Option<PathBuf>,
    /// Scoring config JSON (defaults to assets/scoring_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Emit debug logs on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a mono WAV recording and print the analysis result as JSON
    Score {
        #[arg(long)]
        wav: PathBuf,
        /// Claimed recording duration in seconds (defaults to the audio length)
        #[arg(long)]
        duration: Option<f32>,
        #[arg(long)]
        voice_gate: bool,
        #[arg(long)]
        melody_gate: bool,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Score a deterministic synthetic recording, or write it to a WAV file
    Synth {
        #[arg(long, value_enum)]
        pattern: PatternArg,
        /// Write a 16-bit WAV here instead of scoring the signal
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value_t = 30.0)]
        seconds: f32,
        #[arg(long)]
        frequency: Option<f32>,
        #[arg(long)]
        end_frequency: Option<f32>,
        #[arg(long)]
        amplitude: Option<f32>,
        /// Defaults to the capture sample rate from the scoring config
        #[arg(long)]
        sample_rate: Option<u32>,
    },
    /// Score a fixture and compare against its expectations
    Verify {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List available fixtures on disk
    DumpFixtures,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PatternArg {
    Silence,
    Sine,
    Sweep,
    Vibrato,
    #[value(alias = "noise")]
    WhiteNoise,
}

impl From<PatternArg> for SyntheticPattern {
    fn from(arg: PatternArg) -> Self {
        match arg {
            PatternArg::Silence => SyntheticPattern::Silence,
            PatternArg::Sine => SyntheticPattern::Sine,
            PatternArg::Sweep => SyntheticPattern::Sweep,
            PatternArg::Vibrato => SyntheticPattern::Vibrato,
            PatternArg::WhiteNoise => SyntheticPattern::WhiteNoise,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let app_config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_else(FixtureCatalog::default);

    match cli.command {
        Commands::Score {
            wav,
            duration,
            voice_gate,
            melody_gate,
            output,
        } => {
            let mut config = app_config;
            config.analysis.voice_gate |= voice_gate;
            config.analysis.melody_gate |= melody_gate;
            run_score(&config, &wav, duration, output)
        }
        Commands::Synth {
            pattern,
            output,
            seconds,
            frequency,
            end_frequency,
            amplitude,
            sample_rate,
        } => {
            let mut spec = SyntheticSpec::new(pattern.into(), seconds);
            if let Some(frequency) = frequency {
                spec.frequency_hz = frequency;
            }
            if let Some(end_frequency) = end_frequency {
                spec.end_frequency_hz = end_frequency;
            }
            if let Some(amplitude) = amplitude {
                spec.amplitude = amplitude;
            }
            let sample_rate = sample_rate.unwrap_or(app_config.capture.sample_rate);
            match output {
                Some(output) => run_synth(&spec, sample_rate, &output),
                None => run_synth_score(&app_config, &spec, sample_rate),
            }
        }
        Commands::Verify {
            fixture,
            expect,
            output,
        } => run_verify(&app_config, &catalog, &fixture, expect, output),
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    // Logs go to stderr so stdout stays machine-readable
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_score(
    config: &AppConfig,
    wav: &Path,
    duration: Option<f32>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let audio = read_wav(wav)
        .inspect_err(|err| log_fixture_error(err, "score"))
        .with_context(|| format!("reading {}", wav.display()))?;
    let duration = duration.unwrap_or_else(|| audio.duration_secs());
    tracing::debug!(path = %wav.display(), duration, "scoring recording");

    let scorer = FixtureScorer::new(config.analysis);
    let result = scorer.score(&audio, duration, &config.analysis);

    let source = wav.display().to_string();
    emit_report(&source, audio.sample_rate, &result, output_path)?;
    Ok(ExitCode::from(0))
}

fn run_synth(spec: &SyntheticSpec, sample_rate: u32, output: &Path) -> Result<ExitCode> {
    let samples = spec.render(sample_rate);
    write_wav(output, &samples, sample_rate)
        .inspect_err(|err| log_fixture_error(err, "synth"))
        .with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(
        path = %output.display(),
        samples = samples.len(),
        sample_rate,
        "rendered synthetic recording"
    );
    println!("{}", output.display());
    Ok(ExitCode::from(0))
}

fn run_synth_score(config: &AppConfig, spec: &SyntheticSpec, sample_rate: u32) -> Result<ExitCode> {
    let samples = spec.render(sample_rate);
    let audio = WavAudio {
        samples,
        sample_rate,
    };
    let result = FixtureScorer::new(config.analysis).score(&audio, spec.seconds, &config.analysis);

    let pattern = serde_json::to_value(spec.pattern)?;
    let source = format!("synthetic:{}", pattern.as_str().unwrap_or_default());
    emit_report(&source, sample_rate, &result, None)?;
    Ok(ExitCode::from(0))
}

fn run_verify(
    config: &AppConfig,
    catalog: &FixtureCatalog,
    fixture: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let scorer = FixtureScorer::new(config.analysis);
    let data = catalog
        .load(fixture, override_expect)
        .inspect_err(|err| log_fixture_error(err, "verify"))
        .with_context(|| format!("loading fixture {}", fixture))?;
    let actual = scorer.run(&data);

    emit_report(&data.metadata.name, data.audio.sample_rate, &actual, output_path)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&actual) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(
    source: &str,
    sample_rate: u32,
    result: &AnalysisResult,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let report = ScoreReportPayload {
        source,
        sample_rate,
        level: result.level().to_string(),
        advice: result.advice().iter().map(ToString::to_string).collect(),
        result,
    };
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct ScoreReportPayload<'a> {
    source: &'a str,
    sample_rate: u32,
    level: String,
    advice: Vec<String>,
    result: &'a AnalysisResult,
}
