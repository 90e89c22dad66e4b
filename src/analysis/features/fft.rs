// FFT module - Fast Fourier Transform computation
//
// Frames are zero-padded (or truncated) to the next power of two, capped at
// MAX_FFT_SIZE so per-frame cost stays constant regardless of frame length.
// No window function is applied: the transform uses a rectangular window,
// so a tone between bins leaks into its neighbours.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::{Arc, Mutex, PoisonError};

use super::types::SpectrumResult;

/// Upper bound on the transform length
pub const MAX_FFT_SIZE: usize = 2048;

/// Transform length used for a frame of `frame_len` samples
pub fn fft_size_for(frame_len: usize) -> usize {
    frame_len.max(2).next_power_of_two().min(MAX_FFT_SIZE)
}

/// Computes magnitude/phase spectra for analysis frames
///
/// The planner is shared so frames processed on worker threads reuse the
/// same cached plans.
pub struct SpectrumEngine {
    fft_planner: Arc<Mutex<FftPlanner<f32>>>,
    sample_rate: u32,
}

impl SpectrumEngine {
    /// Create a new spectrum engine
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate of the frames in Hz
    pub fn new(sample_rate: u32) -> Self {
        Self {
            fft_planner: Arc::new(Mutex::new(FftPlanner::new())),
            sample_rate,
        }
    }

    /// Compute the spectrum of one frame
    ///
    /// Only the first `fft_size / 2` bins are returned (real-input symmetry).
    /// Frames shorter than 2 samples produce a single zero bin.
    ///
    /// # Arguments
    /// * `frame` - Time-domain samples normalized to [-1.0, 1.0]
    pub fn analyze(&self, frame: &[f32]) -> SpectrumResult {
        if frame.len() < 2 {
            return SpectrumResult {
                magnitude: vec![0.0],
                phase: vec![0.0],
                frequencies: vec![0.0],
                fft_size: 2,
                sample_rate: self.sample_rate,
            };
        }

        let fft_size = fft_size_for(frame.len());

        let mut buffer: Vec<Complex<f32>> = frame
            .iter()
            .take(fft_size)
            .map(|&sample| Complex::new(sample, 0.0))
            .collect();
        buffer.resize(fft_size, Complex::new(0.0, 0.0));

        let fft = {
            let mut planner = self
                .fft_planner
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            planner.plan_fft_forward(fft_size)
        };
        fft.process(&mut buffer);

        let half = fft_size / 2;
        let bin_width = self.sample_rate as f32 / fft_size as f32;

        SpectrumResult {
            magnitude: buffer[..half].iter().map(|c| c.norm()).collect(),
            phase: buffer[..half].iter().map(|c| c.im.atan2(c.re)).collect(),
            frequencies: (0..half).map(|i| i as f32 * bin_width).collect(),
            fft_size,
            sample_rate: self.sample_rate,
        }
    }
}
