//! Config file loading and `config init` against a real filesystem.

use std::fs;

use cam_preview::camera::Resolution;
use cam_preview::config::{self, Config, ConfigError, DEFAULT_CONFIG};
use cam_preview::display::Backend;
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[camera]\ndevice = 3\nresolution = \"320x240\"\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.camera.device, Some(3));
    assert_eq!(config.camera.resolution, Some(Resolution::LOW));
    assert_eq!(config.display.backend, None);
    assert_eq!(config.controls.quit_key, None);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[camera\ndevice = ").unwrap();

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_unknown_key_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[display]\nmirror = true\n").unwrap();

    assert!(matches!(
        Config::load(Some(&path)),
        Err(ConfigError::Parse { .. })
    ));
}

#[test]
fn test_write_default_creates_parents() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/config.toml");

    config::write_default(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded.display.backend, Some(Backend::Terminal));
}

#[test]
fn test_write_default_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "# mine\n").unwrap();

    let err = config::write_default(&path).unwrap_err();
    assert!(matches!(err, ConfigError::AlreadyExists(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), "# mine\n");
}
