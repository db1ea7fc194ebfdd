//! WAV export
//!
//! Encodes a remixed [`Waveform`] as a mono WAV file, either written to disk
//! or returned as bytes for playback/download.

use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Waveform;

/// WAV export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write WAV file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),

    #[error("Invalid sample rate for export: {0}")]
    InvalidSampleRate(u32),
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Sample encoding of exported WAV files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WavFormat {
    /// 32-bit IEEE float
    #[default]
    Float32,
    /// 16-bit signed PCM
    Pcm16,
}

impl WavFormat {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WavFormat::Float32 => "32-bit float",
            WavFormat::Pcm16 => "16-bit PCM",
        }
    }

    fn spec(&self, sample_rate: u32) -> WavSpec {
        let (bits_per_sample, sample_format) = match self {
            WavFormat::Float32 => (32, SampleFormat::Float),
            WavFormat::Pcm16 => (16, SampleFormat::Int),
        };
        WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample,
            sample_format,
        }
    }
}

/// Write samples through a hound writer and finalize it
fn write_samples<W: Write + Seek>(
    mut writer: WavWriter<W>,
    waveform: &Waveform,
    format: WavFormat,
) -> Result<(), hound::Error> {
    match format {
        WavFormat::Float32 => {
            for &sample in waveform.samples() {
                writer.write_sample(sample)?;
            }
        }
        WavFormat::Pcm16 => {
            for &sample in waveform.samples() {
                writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
            }
        }
    }
    writer.finalize()
}

/// Write a waveform to a WAV file
pub fn write_wav(path: &Path, waveform: &Waveform, format: WavFormat) -> ExportResult<()> {
    if waveform.sample_rate() == 0 {
        return Err(ExportError::InvalidSampleRate(0));
    }
    let to_write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let writer = WavWriter::create(path, format.spec(waveform.sample_rate())).map_err(to_write_error)?;
    write_samples(writer, waveform, format).map_err(to_write_error)?;

    log::info!(
        "Wrote {} ({:.2}s, {})",
        path.display(),
        waveform.duration_secs(),
        format.display_name()
    );
    Ok(())
}

/// Encode a waveform as an in-memory WAV file
pub fn encode_wav(waveform: &Waveform, format: WavFormat) -> ExportResult<Vec<u8>> {
    if waveform.sample_rate() == 0 {
        return Err(ExportError::InvalidSampleRate(0));
    }
    let mut cursor = Cursor::new(Vec::new());
    let writer = WavWriter::new(&mut cursor, format.spec(waveform.sample_rate()))?;
    write_samples(writer, waveform, format)?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_file::decode_bytes;

    #[test]
    fn test_encode_float32() {
        let wave = Waveform::new(vec![0.0, 0.5, -0.25, 0.98], 44100);
        let bytes = encode_wav(&wave, WavFormat::Float32).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        let samples: Vec<f32> = reader.into_samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, wave.samples());
    }

    #[test]
    fn test_encode_pcm16_clamps() {
        let wave = Waveform::new(vec![0.0, 1.5, -1.5, 0.5], 16000);
        let bytes = encode_wav(&wave, WavFormat::Pcm16).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 16);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, i16::MAX, -i16::MAX, 16383]);
    }

    #[test]
    fn test_write_wav_decodes_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("remix.wav");
        let wave = Waveform::new((0..2000).map(|i| (i as f32 * 0.01).sin() * 0.9).collect(), 22050);

        write_wav(&path, &wave, WavFormat::Float32).unwrap();
        let decoded = crate::audio_file::decode_file(&path).unwrap();
        assert_eq!(decoded, wave);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(decode_bytes(bytes).unwrap().len(), 2000);
    }

    #[test]
    fn test_write_to_missing_dir_fails() {
        let wave = Waveform::new(vec![0.1], 8000);
        let err = write_wav(Path::new("/nonexistent/dir/out.wav"), &wave, WavFormat::Pcm16).unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }

    #[test]
    fn test_format_serde_names() {
        assert_eq!(serde_yaml::to_string(&WavFormat::Pcm16).unwrap().trim(), "pcm16");
        let format: WavFormat = serde_yaml::from_str("float32").unwrap();
        assert_eq!(format, WavFormat::Float32);
    }
}
