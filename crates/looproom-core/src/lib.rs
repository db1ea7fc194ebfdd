//! LoopRoom Core - Three-section audio remix pipeline

pub mod audio_file;
pub mod config;
pub mod dsp;
pub mod effect;
pub mod error;
pub mod export;
pub mod preprocess;
pub mod preset;
pub mod remix;
pub mod section;
pub mod timestretch;
pub mod types;

pub use audio_file::AudioSource;
pub use error::{RemixError, RemixResult};
pub use preset::{get_preset_params, Preset, PresetParams};
pub use remix::{remix_audio, RemixRequest, Remixer};
pub use section::{SectionParams, SectionSet};
pub use types::*;
