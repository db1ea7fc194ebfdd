//! Configuration for LoopRoom
//!
//! - [`RemixConfig`]: settings that persist between runs (reverb seed, fade
//!   length, preview length, export format)
//! - Generic YAML loading/saving, also used for remix parameter files
//! - Default paths under the user's config directory

mod io;
mod paths;
mod settings;

pub use io::{load_config, read_yaml, save_config};
pub use paths::{default_config_dir, default_config_path, CONFIG_FILENAME};
pub use settings::RemixConfig;
