//! Subcommand handlers for list-cameras and config actions.

use super::args::{Args, ConfigAction};
use super::settings::RunSettings;
use crate::camera::{self, CameraError};
use crate::config::{self, Config, ConfigError};

/// List available cameras and print them to stdout.
pub fn list_cameras() -> Result<(), CameraError> {
    let devices = camera::list_devices()?;
    if devices.is_empty() {
        println!("No cameras found.");
        println!();
        println!("Make sure your camera is connected and permissions are granted.");
        println!("On macOS, grant access in System Settings > Privacy & Security > Camera.");
    } else {
        println!("Available cameras:");
        for device in devices {
            println!("  {}", device);
        }
        println!();
        println!("Use --camera <index> to select a camera.");
    }
    Ok(())
}

/// Handle config subcommand actions.
///
/// `config show` loads and resolves the file itself, so a bad value is
/// reported next to the file that holds it.
pub fn handle_config_action(action: &ConfigAction, args: &Args) -> Result<(), ConfigError> {
    let path = args.config.clone().unwrap_or_else(config::default_path);

    match action {
        ConfigAction::Show => {
            let settings = match Config::load(Some(path.as_path()))
                .and_then(|config| RunSettings::resolve(args, &config))
            {
                Ok(settings) => settings,
                Err(e) => {
                    println!("Config file: {} (invalid)", path.display());
                    return Err(e);
                }
            };
            print_settings(&settings);

            if path.exists() {
                println!("Config file: {} (exists)", path.display());
            } else {
                println!("Config file: {} (not found)", path.display());
            }
        }
        ConfigAction::Init => {
            config::write_default(&path)?;
            println!("Created config file: {}", path.display());
        }
    }
    Ok(())
}

fn print_settings(settings: &RunSettings) {
    let interval = settings
        .loop_config
        .frame_interval
        .map(|d| format!("{:?}", d))
        .unwrap_or_else(|| "none".to_string());

    println!("Current configuration:");
    println!("  Camera: {}", settings.camera.device_index);
    println!("  Resolution: {}", settings.camera.resolution);
    println!("  Capture FPS: {}", settings.camera.fps);
    println!("  Display: {}", settings.backend);
    println!("  Title: {}", settings.title);
    println!("  Quit key: {}", settings.loop_config.quit_key);
    println!("  Key poll wait: {:?}", settings.loop_config.poll_wait);
    println!("  Frame interval: {}", interval);
    println!();
}
