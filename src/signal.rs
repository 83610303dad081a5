//! Ctrl-C handling.
//!
//! In raw terminal mode Ctrl-C arrives as a key press and is handled by the
//! surface; otherwise (window surface, or before the terminal is taken over)
//! the signal sets a shared flag that the frame loop checks between frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Install a Ctrl-C handler that sets `flag`.
///
/// This should be called once at program startup.
pub fn install_ctrlc_handler(flag: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if !flag.swap(true, Ordering::SeqCst) {
            log::info!("Received Ctrl+C, shutting down...");
        }
    })
}
