//! The acquire -> convert -> present loop.
//!
//! `FrameLoop` owns one capture handle and one surface and moves through
//! `Running -> Draining -> Closed`. A failed open never yields a loop at all,
//! so the init stage exists only inside [`FrameLoop::open`]. Whatever ends
//! the run (stream end, cancellation, a display fault or a panic), teardown
//! releases the surface and then the capture, each exactly once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::camera::{CameraError, Capture};
use crate::display::{DisplayError, KeyCode, Surface};

/// Default key that ends the loop.
pub const DEFAULT_QUIT_KEY: char = 'q';

/// Default wait for a key press each iteration.
pub const DEFAULT_POLL_WAIT: Duration = Duration::from_millis(1);

/// Lifecycle of a `FrameLoop`.
///
/// Callers only ever see `Running`: `run` consumes the loop, and `Draining`
/// and `Closed` are held while `run` or `Drop` tears it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Frames are flowing
    Running,
    /// The loop has exited and resources are being released
    Draining,
    /// Both resources released; terminal
    Closed,
}

/// Why a run ended normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A read produced no valid frame
    StreamEnded,
    /// Quit key, surface closed, or Ctrl-C
    UserCancelled,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::StreamEnded => write!(f, "stream ended"),
            ExitReason::UserCancelled => write!(f, "cancelled by user"),
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: ExitReason,
    /// Frames presented
    pub frames: u64,
}

/// Errors that end a run abnormally.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    /// The camera could not be opened; nothing was started
    #[error("Cannot open camera: {0}")]
    DeviceUnavailable(#[source] CameraError),
    /// The surface failed to open or to present
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Loop tuning.
///
/// `poll_wait` and `frame_interval` are independent: the first bounds how
/// long each iteration waits for a key, the second caps the frame rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Key that ends the loop
    pub quit_key: char,
    /// How long to wait for a key each iteration; never zero
    pub poll_wait: Duration,
    /// Minimum time between iterations; `None` runs as fast as frames arrive
    pub frame_interval: Option<Duration>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            quit_key: DEFAULT_QUIT_KEY,
            poll_wait: DEFAULT_POLL_WAIT,
            frame_interval: None,
        }
    }
}

impl LoopConfig {
    /// Frame interval for a frame-rate cap; 0 means uncapped.
    pub fn interval_for_fps(max_fps: u32) -> Option<Duration> {
        (max_fps > 0).then(|| Duration::from_secs(1) / max_fps)
    }
}

/// Single-threaded frame pump.
pub struct FrameLoop<C: Capture, S: Surface> {
    capture: C,
    surface: S,
    config: LoopConfig,
    cancel: Arc<AtomicBool>,
    state: LoopState,
    frames: u64,
}

impl<C: Capture, S: Surface> FrameLoop<C, S> {
    /// Open the capture, then the surface.
    ///
    /// A capture failure returns `DeviceUnavailable` without calling
    /// `open_surface`; that error is the whole init-to-closed path, since no
    /// loop value is built. A surface failure releases the capture first.
    pub fn open<FC, FS>(open_capture: FC, open_surface: FS, config: LoopConfig) -> Result<Self, LoopError>
    where
        FC: FnOnce() -> Result<C, CameraError>,
        FS: FnOnce() -> Result<S, DisplayError>,
    {
        let mut capture = open_capture().map_err(LoopError::DeviceUnavailable)?;

        let surface = match open_surface() {
            Ok(surface) => surface,
            Err(e) => {
                capture.release();
                return Err(e.into());
            }
        };

        Ok(Self::with_resources(capture, surface, config))
    }

    /// Build a loop around resources that are already open.
    pub fn with_resources(capture: C, surface: S, config: LoopConfig) -> Self {
        let poll_wait = if config.poll_wait.is_zero() {
            // A zero wait would starve the surface's event processing
            DEFAULT_POLL_WAIT
        } else {
            config.poll_wait
        };

        Self {
            capture,
            surface,
            config: LoopConfig { poll_wait, ..config },
            cancel: Arc::new(AtomicBool::new(false)),
            state: LoopState::Running,
            frames: 0,
        }
    }

    /// Use an externally owned cancellation flag, checked once per iteration.
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Handle that cancels the loop at the next iteration boundary.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run until the stream ends or the user cancels, then release both
    /// resources. A display fault is returned after teardown.
    pub fn run(mut self) -> Result<RunSummary, LoopError> {
        log::info!(
            "Presenting on '{}' (press '{}' to quit)",
            self.surface.name(),
            self.config.quit_key
        );

        let outcome = self.pump();
        self.teardown();

        let reason = outcome?;
        let summary = RunSummary {
            reason,
            frames: self.frames,
        };
        log::info!("Stopped after {} frame(s): {}", summary.frames, summary.reason);
        Ok(summary)
    }

    fn pump(&mut self) -> Result<ExitReason, LoopError> {
        loop {
            if self.cancel.load(Ordering::SeqCst) {
                return Ok(ExitReason::UserCancelled);
            }
            let started = Instant::now();

            let frame = match self.capture.read() {
                Ok(frame) => frame,
                Err(e) => {
                    log::info!("Can't receive frame (stream end?): {}", e);
                    return Ok(ExitReason::StreamEnded);
                }
            };

            let frame = frame.into_order(self.surface.pixel_order());
            debug_assert!(frame.is_well_formed(), "frame buffer does not match its dimensions");
            self.surface.show(&frame)?;
            self.frames += 1;
            log::trace!(
                "Frame {} ({}x{}) presented {:?} after capture",
                self.frames,
                frame.width,
                frame.height,
                frame.timestamp.elapsed()
            );
            drop(frame);

            if let Some(key) = self.surface.poll_key(self.config.poll_wait)? {
                if self.is_cancel_key(key) {
                    log::debug!("Cancel key {:?} observed", key);
                    return Ok(ExitReason::UserCancelled);
                }
            }

            self.throttle(started);
        }
    }

    fn is_cancel_key(&self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char(c) => c == self.config.quit_key.to_ascii_lowercase(),
            KeyCode::Interrupt | KeyCode::Close => true,
            KeyCode::Escape | KeyCode::Other => false,
        }
    }

    fn throttle(&self, started: Instant) {
        if let Some(interval) = self.config.frame_interval {
            let elapsed = started.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
    }

    /// Release the surface, then the capture. Runs at most once.
    fn teardown(&mut self) {
        if self.state != LoopState::Running {
            return;
        }
        self.state = LoopState::Draining;
        self.surface.destroy();
        self.capture.release();
        self.state = LoopState::Closed;
    }
}

impl<C: Capture, S: Surface> Drop for FrameLoop<C, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
