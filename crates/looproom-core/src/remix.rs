//! Remix orchestrator
//!
//! Runs the whole pipeline on one track:
//!
//! ```text
//! AudioSource ──load──▶ Waveform (mono, native rate)
//!     │ validate filter bank at the sample rate
//!     ▼
//! preview crop ─▶ speed ─▶ pitch ─▶ reverse
//!     │
//!     ▼ split at t1 / t2
//! ┌───────┬───────┬───────┐
//! │ Intro │ Drop  │ Outro │  each through SectionProcessor
//! └───────┴───────┴───────┘
//!     │ concatenate
//!     ▼
//! fade in/out ─▶ peak normalize (0.98) ─▶ Waveform
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::audio_file::AudioSource;
use crate::config::RemixConfig;
use crate::dsp::{fade_in_out, peak_normalize};
use crate::error::RemixResult;
use crate::preprocess::{preprocess, PreviewWindow};
use crate::preset::get_preset_params;
use crate::section::{split_sections, SectionBounds, SectionProcessor, SectionSet};
use crate::types::{Sample, Section, Waveform, PEAK_CEILING};

/// Everything the caller chooses for one remix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemixRequest {
    /// Playback speed, clamped to 0.6-1.3
    pub speed: f64,
    /// Pitch shift in semitones, clamped to -7..=7
    pub pitch_steps: i32,
    /// Fade in and out
    pub fade: bool,
    /// Play the track backwards
    pub reverse: bool,
    /// Start of the drop in seconds of processed audio
    pub t1: f64,
    /// Start of the outro in seconds of processed audio
    pub t2: f64,
    pub sections: SectionSet,
    /// Render only this window of the source
    pub preview: Option<PreviewWindow>,
}

impl Default for RemixRequest {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch_steps: 0,
            fade: true,
            reverse: false,
            t1: 30.0,
            t2: 60.0,
            sections: SectionSet::default(),
            preview: None,
        }
    }
}

impl RemixRequest {
    /// Default request with a preset's speed, pitch and sections
    pub fn from_preset(name: &str) -> Self {
        let mut request = Self::default();
        get_preset_params(name).apply_to(&mut request);
        request
    }
}

/// Concatenate processed sections in timeline order
///
/// With an empty drop and outro the intro is returned as is.
fn concat_sections(sections: [Waveform; 3]) -> Vec<Sample> {
    let [intro, drop, outro] = sections;
    if drop.is_empty() && outro.is_empty() {
        return intro.into_samples();
    }
    let mut out = Vec::with_capacity(intro.len() + drop.len() + outro.len());
    out.extend_from_slice(intro.samples());
    out.extend_from_slice(drop.samples());
    out.extend_from_slice(outro.samples());
    out
}

/// Runs remixes with one configuration
///
/// The reverb noise source lives as long as the remixer, so a seeded
/// remixer gives reproducible results for its first remix and a
/// deterministic sequence after that.
pub struct Remixer {
    config: RemixConfig,
    processor: SectionProcessor,
}

impl Remixer {
    pub fn new(config: RemixConfig) -> Self {
        let processor = SectionProcessor::new(config.noise_source());
        Self { config, processor }
    }

    pub fn config(&self) -> &RemixConfig {
        &self.config
    }

    /// Decode a source and remix it
    pub fn remix(&mut self, source: AudioSource, request: &RemixRequest) -> RemixResult<Waveform> {
        log::info!("Loading {}", source.describe());
        let waveform = source.load()?;
        self.remix_waveform(waveform, request)
    }

    /// Render the configured preview length starting at `start_time`
    pub fn preview(
        &mut self,
        source: AudioSource,
        request: &RemixRequest,
        start_time: f64,
    ) -> RemixResult<Waveform> {
        let request = RemixRequest {
            preview: Some(PreviewWindow::new(start_time, self.config.preview_duration_secs)),
            ..request.clone()
        };
        self.remix(source, &request)
    }

    /// Remix an already-decoded waveform
    pub fn remix_waveform(&mut self, waveform: Waveform, request: &RemixRequest) -> RemixResult<Waveform> {
        let started = Instant::now();
        let sample_rate = waveform.sample_rate();
        log::info!(
            "Remixing {:.2}s @ {} Hz (speed {:.2}, pitch {}, reverse {}, fade {})",
            waveform.duration_secs(),
            sample_rate,
            request.speed,
            request.pitch_steps,
            request.reverse,
            request.fade
        );

        // Fail on an unusable sample rate before any heavy work
        self.processor.validate(sample_rate, &request.sections)?;

        let waveform = preprocess(waveform, request);
        if waveform.is_empty() {
            log::info!("Nothing to remix after pre-processing");
            return Ok(waveform);
        }

        let bounds = SectionBounds::new(&waveform, request.t1, request.t2);
        log::debug!(
            "Sections: t1 {:.2}s (sample {}), t2 {:.2}s (sample {}), total {} samples",
            bounds.t1,
            bounds.i1,
            bounds.t2,
            bounds.i2,
            bounds.len
        );

        let parts = split_sections(&waveform, &bounds);
        drop(waveform);

        let mut processed = parts;
        for section in Section::ALL {
            let part = &mut processed[section as usize];
            if part.is_empty() {
                log::debug!("{} is empty, skipped", section.name());
                continue;
            }
            log::debug!("Processing {} ({:.2}s)", section.name(), part.duration_secs());
            *part = self.processor.process_waveform(part, request.sections.get(section))?;
        }

        let mut samples = concat_sections(processed);
        if request.fade {
            fade_in_out(&mut samples, sample_rate, self.config.fade_seconds);
        }
        peak_normalize(&mut samples, PEAK_CEILING);

        let out = Waveform::new(samples, sample_rate);
        log::info!(
            "Remix finished: {:.2}s of audio in {:.2?}",
            out.duration_secs(),
            started.elapsed()
        );
        Ok(out)
    }
}

impl Default for Remixer {
    fn default() -> Self {
        Self::new(RemixConfig::default())
    }
}

/// Remix a source with a one-off [`Remixer`]
pub fn remix_audio(
    source: AudioSource,
    request: &RemixRequest,
    config: &RemixConfig,
) -> RemixResult<Waveform> {
    Remixer::new(config.clone()).remix(source, request)
}
