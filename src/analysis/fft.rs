//! FFT (Fast Fourier Transform) analysis module
//!
//! Provides the single-sided amplitude spectrum behind the `fft()`
//! expression function:
//! - Sample rate inferred from the X span of the input
//! - Optional mean (DC) removal before windowing
//! - Various window functions (Hann, Hamming, Blackman, Flat-Top)
//!
//! Magnitudes are corrected for the window's coherent gain, so a sine of
//! amplitude `A` that falls on a bin reads as `A` regardless of the window.

use crate::types::Dataset2D;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window function type for FFT preprocessing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowFunction {
    /// Rectangular window (no windowing)
    Rectangular,
    /// Hann window (good general purpose)
    #[default]
    Hann,
    /// Hamming window (reduced side lobes)
    Hamming,
    /// Blackman window (very low side lobes)
    Blackman,
    /// Flat-top window (accurate amplitude measurement)
    FlatTop,
}

impl WindowFunction {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WindowFunction::Rectangular => "Rectangular",
            WindowFunction::Hann => "Hann",
            WindowFunction::Hamming => "Hamming",
            WindowFunction::Blackman => "Blackman",
            WindowFunction::FlatTop => "Flat-Top",
        }
    }

    /// Get all window functions
    pub fn all() -> &'static [WindowFunction] {
        &[
            WindowFunction::Rectangular,
            WindowFunction::Hann,
            WindowFunction::Hamming,
            WindowFunction::Blackman,
            WindowFunction::FlatTop,
        ]
    }

    /// Compute window coefficient at position i out of n samples
    pub fn coefficient(&self, i: usize, n: usize) -> f64 {
        let phase = 2.0 * PI * i as f64 / n as f64;

        match self {
            WindowFunction::Rectangular => 1.0,
            WindowFunction::Hann => 0.5 * (1.0 - phase.cos()),
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
            // Exactly 0 at the endpoints; clamp away the rounding error
            WindowFunction::Blackman => {
                (0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()).max(0.0)
            }
            WindowFunction::FlatTop => {
                0.21557895 - 0.41663158 * phase.cos() + 0.277263158 * (2.0 * phase).cos()
                    - 0.083578947 * (3.0 * phase).cos()
                    + 0.006947368 * (4.0 * phase).cos()
            }
        }
    }

    /// Generate window coefficients for n samples
    pub fn generate(&self, n: usize) -> Vec<f64> {
        (0..n).map(|i| self.coefficient(i, n)).collect()
    }
}

/// Spectrum configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FftConfig {
    /// Window function to use
    pub window: WindowFunction,
    /// Whether to subtract the mean before windowing
    pub remove_dc: bool,
}

/// FFT analyzer that reuses its planner across spectra
pub struct FftAnalyzer {
    planner: FftPlanner<f64>,
    config: FftConfig,
}

impl FftAnalyzer {
    /// Create analyzer with specific config
    pub fn with_config(config: FftConfig) -> Self {
        Self {
            planner: FftPlanner::new(),
            config,
        }
    }

    /// Single-sided amplitude spectrum of `data`
    ///
    /// X of the result is frequency in cycles per X unit, Y is linear
    /// magnitude. Returns `None` when there are fewer than two points or the
    /// X span is not positive.
    pub fn spectrum(&mut self, data: &Dataset2D) -> Option<Dataset2D> {
        let n = data.len();
        let sample_rate = sample_rate(data.x())?;

        let mean = if self.config.remove_dc {
            data.y().iter().sum::<f64>() / n as f64
        } else {
            0.0
        };

        let window = self.config.window.generate(n);
        let coherent_gain = window.iter().sum::<f64>() / n as f64;
        let mut buffer: Vec<Complex<f64>> = data
            .y()
            .iter()
            .zip(window.iter())
            .map(|(&s, &w)| Complex::new((s - mean) * w, 0.0))
            .collect();

        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let resolution = sample_rate / n as f64;
        let num_bins = n / 2 + 1;
        tracing::debug!(
            "FFT of {} points at {:.6} samples/unit ({} window)",
            n,
            sample_rate,
            self.config.window.display_name()
        );

        Some(Dataset2D::from_points(buffer.iter().take(num_bins).enumerate().map(
            |(i, c)| {
                let mut magnitude = c.norm() / n as f64 / coherent_gain;
                // DC and Nyquist have no mirrored negative-frequency bin
                let is_nyquist = n % 2 == 0 && i == n / 2;
                if i != 0 && !is_nyquist {
                    magnitude *= 2.0;
                }
                (i as f64 * resolution, magnitude)
            },
        )))
    }
}

impl Default for FftAnalyzer {
    fn default() -> Self {
        Self::with_config(FftConfig::default())
    }
}

/// Amplitude spectrum with a one-off analyzer
pub fn amplitude_spectrum(data: &Dataset2D, config: &FftConfig) -> Option<Dataset2D> {
    FftAnalyzer::with_config(*config).spectrum(data)
}

/// Average samples per X unit, assuming uniform spacing
fn sample_rate(x: &[f64]) -> Option<f64> {
    let (first, last) = (x.first()?, x.last()?);
    let span = last - first;
    if x.len() < 2 || !span.is_finite() || span <= 0.0 {
        return None;
    }
    Some((x.len() - 1) as f64 / span)
}
