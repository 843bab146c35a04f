//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings + API keys):
//!   Windows: %APPDATA%\text-to-speech\
//!   macOS:   ~/Library/Application Support/text-to-speech/
//!   Linux:   ~/.config/text-to-speech/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `keys.json`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Full path to `keys.json` (the provider credential store).
    pub keys_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "text-to-speech";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let keys_file = config_dir.join("keys.json");

        Self {
            config_dir,
            settings_file,
            keys_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths.keys_file.file_name().is_some_and(|n| n == "keys.json"));
    }
}
