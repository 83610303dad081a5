//! Raster frame type shared by capture, conversion and display.

use std::fmt;
use std::time::Instant;

/// Channel ordering of a packed 3-byte pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOrder {
    /// Red, green, blue
    Rgb,
    /// Blue, green, red
    Bgr,
}

impl fmt::Display for PixelOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelOrder::Rgb => write!(f, "RGB"),
            PixelOrder::Bgr => write!(f, "BGR"),
        }
    }
}

/// A single captured frame.
///
/// Frames live for one loop iteration: they are converted, presented and
/// dropped before the next one is read.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Packed pixel data, row-major, 3 bytes per pixel
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Channel ordering of `data`
    pub order: PixelOrder,
    /// When the frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Number of bytes per pixel. Every supported ordering has three channels.
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Create a frame stamped with the current time.
    pub fn new(data: Vec<u8>, width: u32, height: u32, order: PixelOrder) -> Self {
        Self {
            data,
            width,
            height,
            order,
            timestamp: Instant::now(),
        }
    }

    /// Number of pixels described by `width` x `height`.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the buffer length matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == self.pixel_count() * Self::BYTES_PER_PIXEL
    }

    /// Read pixel `(x, y)` as `(r, g, b)` regardless of the stored ordering.
    ///
    /// Out-of-range coordinates return black.
    pub fn rgb_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let idx = (y as usize * self.width as usize + x as usize) * Self::BYTES_PER_PIXEL;
        match self.data.get(idx..idx + Self::BYTES_PER_PIXEL) {
            Some(p) => match self.order {
                PixelOrder::Rgb => (p[0], p[1], p[2]),
                PixelOrder::Bgr => (p[2], p[1], p[0]),
            },
            None => (0, 0, 0),
        }
    }
}
