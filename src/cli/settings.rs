//! Effective settings: command-line flags layered over the config file.

use std::time::Duration;

use super::args::Args;
use crate::camera::{CameraSettings, MAX_CAPTURE_FPS};
use crate::config::{Config, ConfigError};
use crate::display::Backend;
use crate::frame_loop::LoopConfig;

/// Default surface title.
pub const DEFAULT_TITLE: &str = "frame";

/// Everything needed to start a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub camera: CameraSettings,
    pub backend: Backend,
    pub title: String,
    pub loop_config: LoopConfig,
}

impl RunSettings {
    /// Resolve settings, preferring flags over file values over defaults.
    ///
    /// # Errors
    /// * `ConfigError::Invalid` - If a file value is out of range
    pub fn resolve(args: &Args, config: &Config) -> Result<Self, ConfigError> {
        let defaults = CameraSettings::default();
        let camera = CameraSettings {
            device_index: args
                .camera
                .or(config.camera.device)
                .unwrap_or(defaults.device_index),
            resolution: args
                .resolution
                .or(config.camera.resolution)
                .unwrap_or(defaults.resolution),
            fps: args.fps.or(config.camera.fps).unwrap_or(defaults.fps),
        };
        if !(1..=MAX_CAPTURE_FPS).contains(&camera.fps) {
            return Err(ConfigError::Invalid(format!(
                "camera fps must be between 1 and {}, got {}",
                MAX_CAPTURE_FPS, camera.fps
            )));
        }

        let quit_key = args
            .quit_key
            .or(config.controls.quit_key)
            .unwrap_or(LoopConfig::default().quit_key);
        if quit_key.is_control() || quit_key.is_whitespace() {
            return Err(ConfigError::Invalid(format!(
                "quit key must be a printable character, got {:?}",
                quit_key
            )));
        }

        let poll_wait = match args.poll_ms.or(config.controls.poll_ms) {
            Some(0) => {
                return Err(ConfigError::Invalid(
                    "poll_ms must be at least 1".to_string(),
                ))
            }
            Some(ms) => Duration::from_millis(ms),
            None => LoopConfig::default().poll_wait,
        };

        let max_fps = args.max_fps.or(config.controls.max_fps).unwrap_or(0);

        Ok(Self {
            camera,
            backend: args
                .display
                .or(config.display.backend)
                .unwrap_or_default(),
            title: args
                .title
                .clone()
                .or_else(|| config.display.title.clone())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            loop_config: LoopConfig {
                quit_key: quit_key.to_ascii_lowercase(),
                poll_wait,
                frame_interval: LoopConfig::interval_for_fps(max_fps),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Resolution;
    use clap::Parser;

    fn parse_config(text: &str) -> Config {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let args = Args::parse_from(["cam-preview"]);
        let settings = RunSettings::resolve(&args, &Config::default()).unwrap();

        assert_eq!(settings.camera, CameraSettings::default());
        assert_eq!(settings.backend, Backend::Terminal);
        assert_eq!(settings.title, "frame");
        assert_eq!(settings.loop_config, LoopConfig::default());
    }

    #[test]
    fn test_resolve_config_values() {
        let args = Args::parse_from(["cam-preview"]);
        let config = parse_config(
            r#"
[camera]
device = 2
resolution = "1280x720"
fps = 15

[display]
backend = "window"
title = "lab"

[controls]
quit_key = "x"
poll_ms = 10
max_fps = 20
"#,
        );
        let settings = RunSettings::resolve(&args, &config).unwrap();

        assert_eq!(settings.camera.device_index, 2);
        assert_eq!(settings.camera.resolution, Resolution::HIGH);
        assert_eq!(settings.camera.fps, 15);
        assert_eq!(settings.backend, Backend::Window);
        assert_eq!(settings.title, "lab");
        assert_eq!(settings.loop_config.quit_key, 'x');
        assert_eq!(settings.loop_config.poll_wait, Duration::from_millis(10));
        assert_eq!(
            settings.loop_config.frame_interval,
            Some(Duration::from_millis(50))
        );
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "cam-preview",
            "--camera",
            "4",
            "--display",
            "terminal",
            "--quit-key",
            "Z",
            "--max-fps",
            "0",
        ]);
        let config = parse_config(
            "[camera]\ndevice = 2\n[display]\nbackend = \"window\"\n[controls]\nmax_fps = 20\n",
        );
        let settings = RunSettings::resolve(&args, &config).unwrap();

        assert_eq!(settings.camera.device_index, 4);
        assert_eq!(settings.backend, Backend::Terminal);
        assert_eq!(settings.loop_config.quit_key, 'z');
        assert_eq!(settings.loop_config.frame_interval, None);
    }

    #[test]
    fn test_zero_poll_in_config_rejected() {
        let args = Args::parse_from(["cam-preview"]);
        let config = parse_config("[controls]\npoll_ms = 0\n");
        let err = RunSettings::resolve(&args, &config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_fps_in_config_rejected() {
        let args = Args::parse_from(["cam-preview"]);
        let config = parse_config("[camera]\nfps = 0\n");
        assert!(RunSettings::resolve(&args, &config).is_err());
    }

    #[test]
    fn test_fps_above_limit_in_config_rejected() {
        let args = Args::parse_from(["cam-preview"]);
        let config = parse_config("[camera]\nfps = 500\n");
        let err = RunSettings::resolve(&args, &config).unwrap_err();
        assert!(err.to_string().contains("between 1 and 120"));

        let config = parse_config("[camera]\nfps = 120\n");
        assert_eq!(RunSettings::resolve(&args, &config).unwrap().camera.fps, 120);
    }

    #[test]
    fn test_whitespace_quit_key_rejected() {
        let args = Args::parse_from(["cam-preview"]);
        let config = parse_config("[controls]\nquit_key = \" \"\n");
        assert!(RunSettings::resolve(&args, &config).is_err());
    }
}
