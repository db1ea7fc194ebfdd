//! Persistent remix settings

use serde::{Deserialize, Serialize};

use crate::dsp::NoiseSource;
use crate::export::WavFormat;

/// Settings that apply to every remix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemixConfig {
    /// Seed for the reverb noise; unset draws a fresh seed per run
    pub reverb_seed: Option<u64>,
    /// Length of each fade ramp in seconds
    pub fade_seconds: f64,
    /// Preview length in seconds
    pub preview_duration_secs: f64,
    /// Sample encoding of exported files
    pub output_format: WavFormat,
}

impl Default for RemixConfig {
    fn default() -> Self {
        Self {
            reverb_seed: None,
            fade_seconds: 1.0,
            preview_duration_secs: 15.0,
            output_format: WavFormat::Float32,
        }
    }
}

impl RemixConfig {
    /// Replace unusable values with defaults
    pub fn validate(&mut self) {
        let defaults = Self::default();
        if !self.fade_seconds.is_finite() || self.fade_seconds < 0.0 {
            log::warn!("Invalid fade_seconds {}, using {}", self.fade_seconds, defaults.fade_seconds);
            self.fade_seconds = defaults.fade_seconds;
        }
        if !self.preview_duration_secs.is_finite() || self.preview_duration_secs <= 0.0 {
            log::warn!(
                "Invalid preview_duration_secs {}, using {}",
                self.preview_duration_secs,
                defaults.preview_duration_secs
            );
            self.preview_duration_secs = defaults.preview_duration_secs;
        }
    }

    /// Noise source for the reverb, seeded if configured
    pub fn noise_source(&self) -> NoiseSource {
        NoiseSource::from_seed_option(self.reverb_seed)
    }
}
