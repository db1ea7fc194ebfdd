//! Command-line argument parsing

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_yaml::Value;

use looproom_core::config::{read_yaml, RemixConfig};
use looproom_core::export::WavFormat;
use looproom_core::preprocess::PreviewWindow;
use looproom_core::RemixRequest;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "looproom")]
#[command(about = "Three-section DJ-style remixes of existing tracks", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/looproom/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Remix an audio file into a WAV file
    Remix(RemixArgs),
    /// List the built-in presets
    Presets,
    /// Print a remix parameter file as YAML
    Params(ParamsArgs),
}

/// Parameter sources shared by `remix` and `params`
///
/// Applied in order: defaults, preset, parameter file, then single flags.
#[derive(Args, Debug, Default)]
pub struct RequestArgs {
    /// Start from a named preset (see `looproom presets`)
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// YAML parameter file (fields as printed by `looproom params`)
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Playback speed (clamped to 0.6-1.3)
    #[arg(long)]
    pub speed: Option<f64>,

    /// Pitch shift in semitones (clamped to -7..7)
    #[arg(long, allow_negative_numbers = true)]
    pub pitch: Option<i32>,

    /// Disable the fade in/out
    #[arg(long)]
    pub no_fade: bool,

    /// Reverse the track
    #[arg(long)]
    pub reverse: bool,

    /// Start of the drop section (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub t1: Option<f64>,

    /// Start of the outro section (seconds)
    #[arg(long, value_name = "SECONDS")]
    pub t2: Option<f64>,
}

impl RequestArgs {
    /// Build the remix request from preset, parameter file and flags
    pub fn build_request(&self) -> Result<RemixRequest> {
        let mut request = match &self.preset {
            Some(name) => RemixRequest::from_preset(name),
            None => RemixRequest::default(),
        };

        if let Some(path) = &self.params {
            let overlay: Value = read_yaml(path)?;
            if !overlay.is_null() {
                let mut merged = serde_yaml::to_value(&request)?;
                merge_yaml(&mut merged, overlay);
                request = serde_yaml::from_value(merged)
                    .with_context(|| format!("Invalid remix parameters in {:?}", path))?;
            }
        }

        if let Some(speed) = self.speed {
            request.speed = speed;
        }
        if let Some(pitch) = self.pitch {
            request.pitch_steps = pitch;
        }
        if self.no_fade {
            request.fade = false;
        }
        if self.reverse {
            request.reverse = true;
        }
        if let Some(t1) = self.t1 {
            request.t1 = t1;
        }
        if let Some(t2) = self.t2 {
            request.t2 = t2;
        }
        Ok(request)
    }
}

/// Overlay `overlay` onto `base`, merging mappings key by key
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[derive(Args, Debug)]
pub struct RemixArgs {
    /// Input audio file (wav, flac, mp3, ogg, ...)
    pub input: PathBuf,

    /// Output WAV file
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub request: RequestArgs,

    /// Render only a short preview window
    #[arg(long)]
    pub preview: bool,

    /// Preview start (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0")]
    pub preview_start: f64,

    /// Preview length (seconds, default from config)
    #[arg(long, value_name = "SECONDS", value_parser = parse_positive_secs)]
    pub preview_duration: Option<f64>,

    /// Seed for the reverb noise (reproducible output)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write 16-bit PCM instead of 32-bit float
    #[arg(long)]
    pub pcm16: bool,
}

fn parse_positive_secs(value: &str) -> std::result::Result<f64, String> {
    let secs: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(format!("expected a positive number of seconds, got {value}"))
    }
}

impl RemixArgs {
    /// Apply per-run overrides on top of the loaded config
    ///
    /// The merged config is validated again so overrides obey the same limits
    /// as the config file.
    pub fn apply_to_config(&self, config: &mut RemixConfig) {
        if let Some(seed) = self.seed {
            config.reverb_seed = Some(seed);
        }
        if let Some(duration) = self.preview_duration {
            config.preview_duration_secs = duration;
        }
        if self.pcm16 {
            config.output_format = WavFormat::Pcm16;
        }
        config.validate();
    }

    /// Full request, including the preview window if one was asked for
    pub fn build_request(&self, config: &RemixConfig) -> Result<RemixRequest> {
        let mut request = self.request.build_request()?;
        if self.preview {
            request.preview = Some(PreviewWindow::new(
                self.preview_start,
                config.preview_duration_secs,
            ));
        }
        Ok(request)
    }
}

#[derive(Args, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}
