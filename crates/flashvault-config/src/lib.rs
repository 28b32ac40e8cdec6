//! Settings management for FlashVault
//!
//! A single TOML settings file, loaded once at startup and written on
//! explicit save. Missing keys are backfilled from defaults; keys this
//! version does not know about survive a load/save round trip.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Data directory holding the settings file, database, and managed assets
pub const DATA_DIR: &str = "data";

/// Settings file name inside the data directory
pub const SETTINGS_FILE: &str = "config.toml";

/// Thumbnail style used when a game has no custom cover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailStyle {
    /// Game title rendered over a gradient background
    #[default]
    NameBackground,
    /// The shared default cover image
    DefaultPicture,
}

/// FlashVault settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the external Flash player executable
    #[serde(default = "default_player_path")]
    pub player_path: PathBuf,

    /// Drive the cover picker through the enhanced in-app mechanism
    #[serde(default = "default_true")]
    pub use_enhanced_cover_picker: bool,

    /// Style for synthesized thumbnails
    #[serde(default)]
    pub thumbnail_style: ThumbnailStyle,

    /// Keys written by other versions; kept verbatim
    #[serde(flatten)]
    pub extra: toml::Table,
}

fn default_player_path() -> PathBuf {
    PathBuf::from("flash_player/flashplayer")
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_path: default_player_path(),
            use_enhanced_cover_picker: true,
            thumbnail_style: ThumbnailStyle::default(),
            extra: toml::Table::new(),
        }
    }
}

impl Settings {
    /// Default settings file location
    pub fn default_path() -> PathBuf {
        Path::new(DATA_DIR).join(SETTINGS_FILE)
    }

    /// Load settings from a file, creating it with defaults when missing
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No settings file at {}, creating defaults", path.display());
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&contents)?;
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        tracing::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.use_enhanced_cover_picker);
        assert_eq!(settings.thumbnail_style, ThumbnailStyle::NameBackground);
        assert!(settings.extra.is_empty());
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = Settings::default();
        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(settings.player_path, parsed.player_path);
        assert_eq!(settings.thumbnail_style, parsed.thumbnail_style);
    }

    #[test]
    fn test_missing_keys_backfilled() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "player_path = \"players/custom\"\n").unwrap();

        let settings = Settings::load(temp_file.path()).unwrap();
        assert_eq!(settings.player_path, PathBuf::from("players/custom"));
        assert!(settings.use_enhanced_cover_picker);
        assert_eq!(settings.thumbnail_style, ThumbnailStyle::NameBackground);
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "thumbnail_style = \"default_picture\"\nfuture_flag = true\n"
        )
        .unwrap();

        let settings = Settings::load(temp_file.path()).unwrap();
        assert_eq!(settings.thumbnail_style, ThumbnailStyle::DefaultPicture);
        assert_eq!(
            settings.extra.get("future_flag"),
            Some(&toml::Value::Boolean(true))
        );

        // Round trip keeps the unknown key
        let out = NamedTempFile::new().unwrap();
        settings.save(out.path()).unwrap();
        let reloaded = Settings::load(out.path()).unwrap();
        assert_eq!(
            reloaded.extra.get("future_flag"),
            Some(&toml::Value::Boolean(true))
        );
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let settings = Settings::load(&path).unwrap();
        assert!(path.exists());
        assert_eq!(settings.player_path, Settings::default().player_path);
    }

    #[test]
    fn test_style_spelling() {
        let parsed: ThumbnailStyle = toml::Value::String("name_background".into())
            .try_into()
            .unwrap();
        assert_eq!(parsed, ThumbnailStyle::NameBackground);
    }
}
