//! Top-level error type for the remix pipeline

use thiserror::Error;

use crate::audio_file::AudioFileError;
use crate::dsp::DspError;

/// Errors that can end a remix
#[derive(Error, Debug)]
pub enum RemixError {
    #[error("Failed to load audio: {0}")]
    Audio(#[from] AudioFileError),

    #[error("DSP error: {0}")]
    Dsp(#[from] DspError),
}

pub type RemixResult<T> = std::result::Result<T, RemixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: RemixError = DspError::InvalidSampleRate(0).into();
        assert!(matches!(err, RemixError::Dsp(DspError::InvalidSampleRate(0))));
        assert!(err.to_string().starts_with("DSP error"));

        let err: RemixError = AudioFileError::NoAudioTrack.into();
        assert_eq!(err.to_string(), "Failed to load audio: No audio track found");
    }
}
