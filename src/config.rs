//! Configuration for stegvault.
//!
//! Settings are read from `~/.stegvault/config.toml` unless a path is given.
//! A missing default file is not an error; built-in defaults apply.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stego::LOSSLESS_FORMATS;
use crate::validate::DEFAULT_MIN_PIXELS;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found. Unable to determine home directory.")]
    NoConfigDir,

    #[error("Format '{0}' is not a supported lossless image format")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    InvalidValue(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Tunable settings. The wire format itself is not configurable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StegoConfig {
    /// Smallest accepted cover image, in pixels.
    pub min_pixels: u64,

    /// Accepted cover formats by extension name ("png", "bmp", "tiff").
    pub formats: Vec<String>,

    /// Reject encrypted payloads older than this many seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_ttl_secs: Option<u64>,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            min_pixels: DEFAULT_MIN_PIXELS,
            formats: vec!["png".into(), "bmp".into(), "tiff".into()],
            token_ttl_secs: None,
        }
    }
}

impl StegoConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    /// Loads the configuration from an explicit file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StegoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(get_config_dir()?.join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.formats.is_empty() {
            return Err(ConfigError::InvalidValue("formats must not be empty"));
        }
        if self.token_ttl_secs == Some(0) {
            return Err(ConfigError::InvalidValue("token_ttl_secs must be positive"));
        }
        self.image_formats().map(|_| ())
    }

    /// Resolves `formats` to image formats, refusing anything lossy.
    pub fn image_formats(&self) -> Result<Vec<ImageFormat>, ConfigError> {
        self.formats
            .iter()
            .map(|name| {
                ImageFormat::from_extension(name.to_ascii_lowercase())
                    .filter(|f| LOSSLESS_FORMATS.contains(f))
                    .ok_or_else(|| ConfigError::UnsupportedFormat(name.clone()))
            })
            .collect()
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_secs.map(Duration::from_secs)
    }
}

/// Get the stegvault config directory (`~/.stegvault`).
pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".stegvault"))
        .ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StegoConfig::default();

        assert_eq!(config.min_pixels, 10_000);
        assert_eq!(
            config.image_formats().unwrap(),
            [ImageFormat::Png, ImageFormat::Bmp, ImageFormat::Tiff]
        );
        assert_eq!(config.token_ttl(), None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = StegoConfig::from_toml_str("token_ttl_secs = 3600\n").unwrap();

        assert_eq!(config.token_ttl(), Some(Duration::from_secs(3600)));
        assert_eq!(config.min_pixels, DEFAULT_MIN_PIXELS);
    }

    #[test]
    fn test_narrowed_formats() {
        let config = StegoConfig::from_toml_str("formats = [\"PNG\"]\nmin_pixels = 1\n").unwrap();

        assert_eq!(config.image_formats().unwrap(), [ImageFormat::Png]);
        assert_eq!(config.min_pixels, 1);
    }

    #[test]
    fn test_lossy_format_rejected() {
        let result = StegoConfig::from_toml_str("formats = [\"png\", \"jpg\"]\n");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(f)) if f == "jpg"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            StegoConfig::from_toml_str("formats = []\n"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            StegoConfig::from_toml_str("token_ttl_secs = 0\n"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            StegoConfig::from_toml_str("min_pixels = \"lots\"\n"),
            Err(ConfigError::TomlParseError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "min_pixels = 2500\n").unwrap();

        let config = StegoConfig::from_file(&path).unwrap();
        assert_eq!(config.min_pixels, 2500);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = StegoConfig {
            token_ttl_secs: Some(60),
            ..StegoConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();

        assert_eq!(StegoConfig::from_toml_str(&text).unwrap(), config);
    }
}
