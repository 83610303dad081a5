//! Configuration file handling for cam-preview.
//!
//! Loads configuration from `<config dir>/cam-preview/config.toml` or a
//! custom path given with `--config`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::camera::Resolution;
use crate::display::Backend;

/// Configuration file structure.
///
/// Every field is optional; anything missing falls back to the built-in
/// default or to a command-line flag.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CameraConfig {
    pub device: Option<u32>,
    pub resolution: Option<Resolution>,
    pub fps: Option<u32>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    pub backend: Option<Backend>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ControlsConfig {
    pub quit_key: Option<char>,
    pub poll_ms: Option<u64>,
    pub max_fps: Option<u32>,
}

/// Default config written by `config init`.
pub const DEFAULT_CONFIG: &str = r#"# cam-preview configuration

[camera]
# Camera device index (see `cam-preview list-cameras`)
device = 0
# Requested capture resolution
resolution = "640x480"
# Requested capture frame rate
fps = 30

[display]
# Where to present frames: "terminal" or "window"
backend = "terminal"
# Window / terminal title
title = "frame"

[controls]
# Key that stops the preview
quit_key = "q"
# How long to wait for a key press each frame, in milliseconds (>= 1)
poll_ms = 1
# Frame rate cap for presentation; 0 means uncapped
max_fps = 0
"#;

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?;
            log::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// `config init` refuses to overwrite an existing file
    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    /// A value parsed but is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Write [`DEFAULT_CONFIG`] to `path`, creating parent directories.
pub fn write_default(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()));
    }
    let io_err = |e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(io_err)
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("cam-preview").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/cam-preview/config.toml")
        })
}
