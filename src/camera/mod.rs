//! Camera capture: the `Capture` trait, device listing and the nokhwa backend.

#[cfg(feature = "camera")]
mod capture;
mod device;
mod types;

#[cfg(feature = "camera")]
pub use capture::NokhwaCapture;
pub use device::list_devices;
pub use types::{CameraError, CameraInfo, CameraSettings, Resolution, MAX_CAPTURE_FPS};

use crate::frame::Frame;

/// An open camera connection.
///
/// `read` blocks until the device yields the next frame. An `Err` means the
/// stream produced no valid frame; the caller treats it as end-of-stream and
/// never retries. `release` must be safe to call more than once.
pub trait Capture {
    /// Pull the next frame from the device.
    fn read(&mut self) -> Result<Frame, CameraError>;

    /// Close the device. Subsequent calls are no-ops.
    fn release(&mut self);
}

impl<C: Capture + ?Sized> Capture for Box<C> {
    fn read(&mut self) -> Result<Frame, CameraError> {
        (**self).read()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Open the camera described by `settings` with the compiled-in backend.
#[cfg(feature = "camera")]
pub fn open_device(settings: &CameraSettings) -> Result<Box<dyn Capture>, CameraError> {
    Ok(Box::new(NokhwaCapture::open(settings)?))
}

/// Open the camera described by `settings` with the compiled-in backend.
#[cfg(not(feature = "camera"))]
pub fn open_device(_settings: &CameraSettings) -> Result<Box<dyn Capture>, CameraError> {
    Err(CameraError::Unsupported)
}
