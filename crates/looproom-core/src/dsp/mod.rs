//! DSP building blocks
//!
//! Whole-buffer (offline) primitives used by the effect chain and the remix
//! orchestrator:
//!
//! - Butterworth low/high-pass filter design and forward filtering
//! - FFT overlap-add convolution
//! - Gain, peak normalization, fades, reversal
//! - Seedable Gaussian noise

pub mod convolve;
pub mod error;
pub mod filter;
pub mod level;
pub mod noise;

pub use convolve::convolve_truncated;
pub use error::{DspError, DspResult};
pub use filter::{high_pass, low_pass, Butterworth, FilterSpec, FilterType};
pub use level::{db_to_gain, fade_in_out, peak_normalize, reverse};
pub use noise::NoiseSource;
