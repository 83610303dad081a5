//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::camera::{Resolution, MAX_CAPTURE_FPS};
use crate::display::Backend;

/// Live camera preview in the terminal or a window
#[derive(Parser, Debug)]
#[command(name = "cam-preview")]
#[command(version, about = "Live camera preview in the terminal or a window", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Camera device index (from list-cameras) [default: 0]
    #[arg(short = 'd', long)]
    pub camera: Option<u32>,

    /// Where to present frames [default: terminal]
    #[arg(long)]
    pub display: Option<Backend>,

    /// Window / terminal title [default: frame]
    #[arg(long)]
    pub title: Option<String>,

    /// Key that stops the preview [default: q]
    #[arg(long)]
    pub quit_key: Option<char>,

    /// Milliseconds to wait for a key press each frame [default: 1]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: Option<u64>,

    /// Presentation frame rate cap, 0 for none [default: 0]
    #[arg(long)]
    pub max_fps: Option<u32>,

    /// Requested capture resolution, WIDTHxHEIGHT [default: 640x480]
    #[arg(long)]
    pub resolution: Option<Resolution>,

    /// Requested capture frame rate, 1-120 [default: 30]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_CAPTURE_FPS as i64))]
    pub fps: Option<u32>,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available cameras
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Create default config file
    Init,
}
