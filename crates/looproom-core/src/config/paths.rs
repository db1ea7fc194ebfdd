//! Default locations of LoopRoom configuration files

use std::path::PathBuf;

/// File name of the persistent remix config
pub const CONFIG_FILENAME: &str = "config.yaml";

/// Get the LoopRoom config directory
///
/// Returns: `~/.config/looproom` (platform config dir), or `./looproom` if
/// the platform has none
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("looproom")
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_ends_with_looproom() {
        assert!(default_config_dir().ends_with("looproom"));
    }

    #[test]
    fn test_config_path_includes_filename() {
        assert!(default_config_path().ends_with("looproom/config.yaml"));
    }
}
