use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cam_preview::camera;
use cam_preview::cli::{self, Args, Command, RunSettings};
use cam_preview::config::Config;
use cam_preview::display;
use cam_preview::signal::install_ctrlc_handler;
use cam_preview::{ExitReason, FrameLoop};
use clap::Parser;

fn main() -> ExitCode {
    // Default to warn: anything chattier would scribble over the terminal surface
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Subcommands don't need the resolved settings; only the preview does
    match &args.command {
        Some(Command::ListCameras) => match cli::list_cameras() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(e),
        },
        Some(Command::Config { action }) => match cli::handle_config_action(action, &args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(e),
        },
        None => {
            let settings = match Config::load(args.config.as_deref())
                .and_then(|config| RunSettings::resolve(&args, &config))
            {
                Ok(settings) => settings,
                Err(e) => return fail(e),
            };
            run_preview(&settings)
        }
    }
}

/// Open the camera and surface, then pump frames until done.
fn run_preview(settings: &RunSettings) -> ExitCode {
    let cancel = Arc::new(AtomicBool::new(false));
    if let Err(e) = install_ctrlc_handler(Arc::clone(&cancel)) {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let frame_loop = FrameLoop::open(
        || camera::open_device(&settings.camera),
        || display::open_surface(settings.backend, &settings.title, settings.camera.resolution),
        settings.loop_config.clone(),
    );
    let frame_loop = match frame_loop {
        Ok(frame_loop) => frame_loop.with_cancel_flag(cancel),
        Err(e) => return fail(e),
    };

    match frame_loop.run() {
        Ok(summary) => {
            match summary.reason {
                ExitReason::StreamEnded => {
                    eprintln!("Can't receive frame (stream end?). Exiting...")
                }
                ExitReason::UserCancelled => eprintln!("Stopped."),
            }
            log::info!("{} frame(s) presented", summary.frames);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(e: impl std::fmt::Display) -> ExitCode {
    eprintln!("Error: {}", e);
    ExitCode::FAILURE
}
