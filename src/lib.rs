//! cam-preview library crate.
//!
//! Pulls frames from a camera, reorders their colour channels for the
//! chosen surface and presents them until the stream ends or the user quits.
//! The binary is a thin wrapper; everything here is exposed for testing.

pub mod camera;
pub mod cli;
pub mod config;
pub mod convert;
pub mod display;
pub mod frame;
pub mod frame_loop;
pub mod signal;

pub use frame::{Frame, PixelOrder};
pub use frame_loop::{ExitReason, FrameLoop, LoopConfig, LoopError, LoopState, RunSummary};
