//! nokhwa-backed camera handle.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::device::list_devices;
use super::types::{CameraError, CameraSettings, Resolution};
use super::Capture;
use crate::frame::{Frame, PixelOrder};

/// Camera capture handle.
///
/// Wraps a nokhwa `Camera` with its stream already open. Frames are pulled
/// synchronously on the caller's thread with [`Capture::read`] and decoded
/// to packed RGB.
pub struct NokhwaCapture {
    /// The open camera, `None` once released
    camera: Option<Camera>,
    /// Settings the camera was opened with
    settings: CameraSettings,
    /// Resolution the device actually negotiated
    actual_resolution: Resolution,
    /// Frame rate the device actually negotiated
    actual_fps: u32,
}

impl std::fmt::Debug for NokhwaCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NokhwaCapture")
            .field("settings", &self.settings)
            .field("actual_resolution", &self.actual_resolution)
            .field("actual_fps", &self.actual_fps)
            .field("is_open", &self.is_open())
            .finish()
    }
}

impl NokhwaCapture {
    /// Open a camera and start its stream.
    ///
    /// # Errors
    /// * `CameraError::NoDevices` - If the system reports no cameras
    /// * `CameraError::DeviceNotFound` - If the device index doesn't exist
    /// * `CameraError::PermissionDenied` - If camera access is denied (macOS)
    /// * `CameraError::OpenFailed` - If the camera fails to open for other reasons
    /// * `CameraError::StreamFailed` - If the stream fails to start
    pub fn open(settings: &CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if devices.is_empty() {
            return Err(CameraError::NoDevices);
        }
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }

        let index = CameraIndex::Index(settings.device_index);
        let mut camera = open_camera_with_fallback(&index, settings)?;
        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let res = camera.resolution();
        let actual_resolution = Resolution {
            width: res.width(),
            height: res.height(),
        };
        let actual_fps = camera.frame_rate();
        log::info!(
            "Camera {} open at {} @ {} fps (requested {} @ {} fps)",
            settings.device_index,
            actual_resolution,
            actual_fps,
            settings.resolution,
            settings.fps
        );

        Ok(Self {
            camera: Some(camera),
            settings: settings.clone(),
            actual_resolution,
            actual_fps,
        })
    }

    /// Resolution the device is actually delivering.
    pub fn actual_resolution(&self) -> Resolution {
        self.actual_resolution
    }

    /// Frame rate the device is actually delivering.
    pub fn actual_fps(&self) -> u32 {
        self.actual_fps
    }

    /// Whether the stream is still open.
    pub fn is_open(&self) -> bool {
        self.camera.is_some()
    }
}

impl Capture for NokhwaCapture {
    fn read(&mut self) -> Result<Frame, CameraError> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| CameraError::ReadFailed("camera already released".to_string()))?;

        let buffer = camera
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;
        // decode_image handles MJPEG, YUYV, NV12 and friends
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;
        let resolution = buffer.resolution();

        Ok(Frame::new(
            decoded.into_raw(),
            resolution.width(),
            resolution.height(),
            PixelOrder::Rgb,
        ))
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera stream: {}", e);
            }
            log::info!("Camera {} released", self.settings.device_index);
        }
    }
}

impl Drop for NokhwaCapture {
    fn drop(&mut self) {
        self.release();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    let requested_res =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);

    // In order of preference:
    // 1. Closest match with MJPEG (widely supported, cheap on USB bandwidth)
    // 2. Closest match with YUYV (uncompressed fallback on most UVC devices)
    // 3. Highest resolution available (let camera decide format)
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_res,
            NokhwaFrameFormat::YUYV,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("Camera format attempt failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    let Some(e) = last_error else {
        return Err(CameraError::OpenFailed("no format attempts made".to_string()));
    };
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_open_invalid_device() {
        // Use a device index that is very unlikely to exist
        let settings = CameraSettings {
            device_index: 999,
            ..CameraSettings::default()
        };
        let result = NokhwaCapture::open(&settings);
        assert!(result.is_err());
    }
}
