//! Named parameter presets
//!
//! A preset is a starting point for a remix: speed, pitch, and the three
//! section parameter sets. Looking up an unknown name gives the defaults.

use serde::{Deserialize, Serialize};

use crate::remix::RemixRequest;
use crate::section::{SectionParams, SectionSet};

/// Built-in presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    SlowedReverb,
    LofiSlow,
    Nightcore,
    PodcastClean,
}

impl Preset {
    /// Get all presets
    pub fn all() -> &'static [Preset] {
        &[
            Preset::SlowedReverb,
            Preset::LofiSlow,
            Preset::Nightcore,
            Preset::PodcastClean,
        ]
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            Preset::SlowedReverb => "Slowed Reverb",
            Preset::LofiSlow => "Lo-Fi Slow",
            Preset::Nightcore => "Nightcore",
            Preset::PodcastClean => "Podcast Clean",
        }
    }

    /// Look up a preset by display name (exact match)
    pub fn from_name(name: &str) -> Option<Preset> {
        Self::all().iter().copied().find(|p| p.name() == name)
    }

    /// Parameter bundle for this preset
    pub fn params(&self) -> PresetParams {
        let defaults = PresetParams::default();
        match self {
            Preset::SlowedReverb => PresetParams {
                speed: 0.82,
                pitch: -3,
                sections: SectionSet {
                    intro: SectionParams::new(0.25, 0.15, 0.6, 0.3),
                    drop: SectionParams::new(0.7, 0.25, 0.8, 0.4),
                    outro: SectionParams::new(0.3, 0.15, 0.9, 0.5),
                },
            },
            Preset::LofiSlow => PresetParams {
                speed: 0.8,
                pitch: -2,
                ..defaults
            },
            Preset::Nightcore => PresetParams {
                speed: 1.3,
                pitch: 3,
                ..defaults
            },
            Preset::PodcastClean => defaults,
        }
    }
}

/// Speed, pitch and section parameters supplied by a preset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetParams {
    pub speed: f64,
    pub pitch: i32,
    pub sections: SectionSet,
}

impl Default for PresetParams {
    fn default() -> Self {
        Self {
            speed: 1.0,
            pitch: 0,
            sections: SectionSet::default(),
        }
    }
}

impl PresetParams {
    /// Copy speed, pitch and section parameters into a request
    pub fn apply_to(&self, request: &mut RemixRequest) {
        request.speed = self.speed;
        request.pitch_steps = self.pitch;
        request.sections = self.sections;
    }
}

/// Parameter bundle for a preset name; unknown names give the defaults
pub fn get_preset_params(name: &str) -> PresetParams {
    match Preset::from_name(name) {
        Some(preset) => preset.params(),
        None => {
            log::debug!("Unknown preset {:?}, using defaults", name);
            PresetParams::default()
        }
    }
}
