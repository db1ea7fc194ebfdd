//! Audio file decoding
//!
//! Decodes any container/codec symphonia supports (WAV, FLAC, MP3, OGG,
//! AAC, ...) from a path, an in-memory byte buffer, or a seekable stream.
//! The first audio track is decoded in full and downmixed to a mono
//! [`Waveform`] at its native sample rate.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::types::{Sample, Waveform};

/// Audio decoding errors
#[derive(Error, Debug)]
pub enum AudioFileError {
    #[error("Failed to open audio file: {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Audio track has no sample rate")]
    UnknownSampleRate,

    #[error("Corrupt audio stream: {0}")]
    Corrupt(String),
}

pub type AudioFileResult<T> = std::result::Result<T, AudioFileError>;

/// Where remix input audio comes from
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Encoded audio file on disk
    Path(PathBuf),
    /// Encoded audio held in memory (e.g. an upload)
    Bytes(Vec<u8>),
    /// Already-decoded mono samples
    Samples(Waveform),
}

impl AudioSource {
    /// Decode the source into a mono waveform
    pub fn load(self) -> AudioFileResult<Waveform> {
        match self {
            AudioSource::Path(path) => decode_file(&path),
            AudioSource::Bytes(bytes) => decode_bytes(bytes),
            AudioSource::Samples(waveform) => Ok(waveform),
        }
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            AudioSource::Path(path) => path.display().to_string(),
            AudioSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            AudioSource::Samples(waveform) => {
                format!("<{} samples @ {} Hz>", waveform.len(), waveform.sample_rate())
            }
        }
    }
}

impl From<PathBuf> for AudioSource {
    fn from(path: PathBuf) -> Self {
        AudioSource::Path(path)
    }
}

impl From<&Path> for AudioSource {
    fn from(path: &Path) -> Self {
        AudioSource::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for AudioSource {
    fn from(bytes: Vec<u8>) -> Self {
        AudioSource::Bytes(bytes)
    }
}

impl From<Waveform> for AudioSource {
    fn from(waveform: Waveform) -> Self {
        AudioSource::Samples(waveform)
    }
}

/// Decode an audio file on disk
pub fn decode_file(path: &Path) -> AudioFileResult<Waveform> {
    let file = std::fs::File::open(path).map_err(|e| AudioFileError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    let extension = path.extension().and_then(|e| e.to_str());
    decode_stream(Box::new(file), extension)
}

/// Decode encoded audio held in memory
pub fn decode_bytes(bytes: Vec<u8>) -> AudioFileResult<Waveform> {
    decode_stream(Box::new(Cursor::new(bytes)), None)
}

/// Decode any seekable media stream
///
/// `extension` is a format hint only; the container is always probed.
pub fn decode_stream(source: Box<dyn MediaSource>, extension: Option<&str>) -> AudioFileResult<Waveform> {
    let mss = MediaSourceStream::new(source, Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AudioFileError::UnsupportedFormat(e.to_string()))?;
    let mut format = probed.format;

    // First audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AudioFileError::NoAudioTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(AudioFileError::UnknownSampleRate)?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioFileError::UnsupportedFormat(e.to_string()))?;

    let mut interleaved: Vec<Sample> = Vec::new();
    let mut channels = 0usize;
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut skipped = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(AudioFileError::Corrupt(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                skipped += 1;
                continue;
            }
            Err(e) => return Err(AudioFileError::Corrupt(e.to_string())),
        };

        // Size the sample buffer from the first decoded packet, growing if a
        // later packet is larger
        let spec = *decoded.spec();
        let capacity = decoded.capacity() as u64;
        if sample_buf
            .as_ref()
            .map_or(true, |buf| (buf.capacity() as u64) < capacity * spec.channels.count() as u64)
        {
            sample_buf = Some(SampleBuffer::new(capacity, spec));
        }
        channels = spec.channels.count();

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} undecodable packets", skipped);
    }
    log::debug!(
        "Decoded {} frames, {} channel(s) @ {} Hz",
        interleaved.len() / channels.max(1),
        channels,
        sample_rate
    );

    Ok(Waveform::from_interleaved(&interleaved, channels, sample_rate))
}
