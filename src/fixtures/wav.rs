// WAV decoding for fixtures and the CLI harness

use std::path::Path;

use crate::error::FixtureError;
use crate::pcm::normalize_sample;

/// Decoded mono PCM
#[derive(Debug, Clone, PartialEq)]
pub struct WavAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl WavAudio {
    /// Length of the audio in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

fn decode_error(path: &Path, err: hound::Error) -> FixtureError {
    FixtureError::Decode {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Read a mono WAV file into normalized floats
///
/// Supports 16/24/32-bit integer and 32-bit float PCM.
pub fn read_wav(path: &Path) -> Result<WavAudio, FixtureError> {
    let mut reader = hound::WavReader::open(path).map_err(|err| FixtureError::WavOpen {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(FixtureError::UnsupportedFormat {
            path: path.display().to_string(),
            reason: format!("must be mono (found {} channels)", spec.channels),
        });
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|sample| sample.map_err(|err| decode_error(path, err)))
            .collect::<Result<Vec<f32>, _>>()?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|sample| sample.map(normalize_sample).map_err(|err| decode_error(path, err)))
                .collect::<Result<Vec<f32>, _>>()?,
            24 | 32 => {
                let max = ((1i64 << (spec.bits_per_sample - 1)) - 1) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| {
                        sample
                            .map(|value| (value as f32 / max).clamp(-1.0, 1.0))
                            .map_err(|err| decode_error(path, err))
                    })
                    .collect::<Result<Vec<f32>, _>>()?
            }
            other => {
                return Err(FixtureError::UnsupportedFormat {
                    path: path.display().to_string(),
                    reason: format!("unsupported bits per sample {}", other),
                })
            }
        },
    };

    log::debug!(
        "[Fixtures] Decoded {} samples at {} Hz from {}",
        samples.len(),
        spec.sample_rate,
        path.display()
    );

    Ok(WavAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write normalized floats as a mono 16-bit WAV file
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), FixtureError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let open_error = |err: hound::Error| FixtureError::WavOpen {
        path: path.display().to_string(),
        reason: err.to_string(),
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(open_error)?;
    for &sample in samples {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer.write_sample(value).map_err(open_error)?;
    }
    writer.finalize().map_err(open_error)
}
