//! Command-line interface definitions and helpers.
//!
//! This module contains argument parsing, settings resolution and the
//! subcommand handlers.

mod args;
mod commands;
mod settings;

pub use args::{Args, Command, ConfigAction};
pub use commands::{handle_config_action, list_cameras};
pub use settings::RunSettings;
