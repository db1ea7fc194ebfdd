//! DSP error types
//!
//! Filter design and FFT failures. Every variant is a configuration problem
//! that is raised before any heavy processing starts, never mid-stream.

use thiserror::Error;

/// Errors that can occur while designing or running DSP building blocks
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    /// Cutoff at or above Nyquist for the given sample rate
    #[error("Filter cutoff {cutoff_hz} Hz must be below Nyquist ({nyquist_hz} Hz)")]
    CutoffAboveNyquist { cutoff_hz: f64, nyquist_hz: f64 },

    /// Cutoff is zero, negative, or not finite
    #[error("Invalid filter cutoff: {0} Hz")]
    InvalidCutoff(f64),

    /// Filter order must be at least 1
    #[error("Invalid filter order: {0}")]
    InvalidOrder(usize),

    /// Sample rate must be non-zero
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// FFT plan or transform failed
    #[error("FFT error: {0}")]
    Fft(String),
}

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DspError::CutoffAboveNyquist {
            cutoff_hz: 6000.0,
            nyquist_hz: 4000.0,
        };
        assert!(err.to_string().contains("6000"));
        assert!(err.to_string().contains("4000"));

        let err = DspError::InvalidOrder(0);
        assert!(err.to_string().contains("order"));
    }
}
