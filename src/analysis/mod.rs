//! Analysis module for signal processing
//!
//! This module provides the dataset transforms behind the series-only
//! expression functions:
//! - FFT (Fast Fourier Transform) amplitude spectrum (`fft`)
//! - Running integral, derivative and RMS time histories (`int`, `diff`, `rms`)

pub mod fft;
pub mod signals;

pub use fft::{amplitude_spectrum, FftAnalyzer, FftConfig, WindowFunction};
