//! Display surfaces that present frames and report key presses.
//!
//! Two backends exist: a terminal surface drawn with crossterm (always
//! available) and a native window drawn with minifb (`window` feature).

mod layout;
mod terminal;
#[cfg(feature = "window")]
mod window;

pub use layout::{fit_viewport, Viewport};
pub use terminal::TerminalSurface;
#[cfg(feature = "window")]
pub use window::WindowSurface;

use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::camera::Resolution;
use crate::frame::{Frame, PixelOrder};

/// A key observed by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable key, lowercased
    Char(char),
    Escape,
    /// Ctrl-C delivered as a key press (raw terminal mode)
    Interrupt,
    /// The user closed the surface
    Close,
    Other,
}

/// Errors raised by display surfaces.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    /// Terminal I/O failed
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The native window could not be created or updated
    #[error("Window error: {0}")]
    Window(String),
    /// The requested backend was not compiled in
    #[error("The {0} display is not compiled in (enable the `{0}` feature)")]
    Unsupported(&'static str),
}

/// An open output sink.
///
/// Implementations own whatever OS resource backs them and must release it
/// in `destroy`, which is safe to call more than once.
pub trait Surface {
    /// Name shown to the user (window or terminal title).
    fn name(&self) -> &str;

    /// Channel ordering `show` expects.
    fn pixel_order(&self) -> PixelOrder;

    /// Render one frame.
    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Wait up to `wait` for a key press.
    fn poll_key(&mut self, wait: Duration) -> Result<Option<KeyCode>, DisplayError>;

    /// Tear the surface down. Subsequent calls are no-ops.
    fn destroy(&mut self);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn pixel_order(&self) -> PixelOrder {
        (**self).pixel_order()
    }

    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        (**self).show(frame)
    }

    fn poll_key(&mut self, wait: Duration) -> Result<Option<KeyCode>, DisplayError> {
        (**self).poll_key(wait)
    }

    fn destroy(&mut self) {
        (**self).destroy()
    }
}

/// Which surface to present frames on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Half-block true-colour rendering in the current terminal
    #[default]
    Terminal,
    /// Native window
    Window,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Terminal => write!(f, "terminal"),
            Backend::Window => write!(f, "window"),
        }
    }
}

/// Open a surface of the given kind.
///
/// `size` is the initial window size; the terminal surface ignores it.
pub fn open_surface(
    backend: Backend,
    title: &str,
    size: Resolution,
) -> Result<Box<dyn Surface>, DisplayError> {
    match backend {
        Backend::Terminal => Ok(Box::new(TerminalSurface::open(title)?)),
        Backend::Window => open_window(title, size),
    }
}

#[cfg(feature = "window")]
fn open_window(title: &str, size: Resolution) -> Result<Box<dyn Surface>, DisplayError> {
    Ok(Box::new(WindowSurface::open(title, size)?))
}

#[cfg(not(feature = "window"))]
fn open_window(_title: &str, _size: Resolution) -> Result<Box<dyn Surface>, DisplayError> {
    Err(DisplayError::Unsupported("window"))
}
