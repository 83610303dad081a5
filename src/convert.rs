//! Channel reordering between pixel orderings.
//!
//! The only transform the preview performs: swap the red and blue channels
//! when the camera's ordering differs from what the surface expects. It is a
//! pure reorder, so output length always equals input length.

use crate::frame::{Frame, PixelOrder};

/// A channel reordering between two pixel orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorConversion {
    BgrToRgb,
    RgbToBgr,
}

impl ColorConversion {
    /// The conversion needed to go from `from` to `to`, if any.
    pub fn between(from: PixelOrder, to: PixelOrder) -> Option<Self> {
        match (from, to) {
            (PixelOrder::Bgr, PixelOrder::Rgb) => Some(ColorConversion::BgrToRgb),
            (PixelOrder::Rgb, PixelOrder::Bgr) => Some(ColorConversion::RgbToBgr),
            _ => None,
        }
    }

    /// The conversion that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            ColorConversion::BgrToRgb => ColorConversion::RgbToBgr,
            ColorConversion::RgbToBgr => ColorConversion::BgrToRgb,
        }
    }

    /// Reorder a packed 3-channel buffer in place.
    pub fn apply_in_place(self, data: &mut [u8]) {
        // Both directions are the same R/B swap.
        swap_red_blue(data);
    }

    /// Reorder a packed 3-channel buffer into a new buffer.
    pub fn apply(self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_in_place(&mut out);
        out
    }
}

/// Swap the first and third byte of every 3-byte pixel.
///
/// Caller contract: `data.len()` is a multiple of 3. Trailing bytes of a
/// malformed buffer are left untouched.
pub fn swap_red_blue(data: &mut [u8]) {
    debug_assert!(
        data.len() % Frame::BYTES_PER_PIXEL == 0,
        "pixel buffer length {} is not a multiple of {}",
        data.len(),
        Frame::BYTES_PER_PIXEL
    );
    for px in data.chunks_exact_mut(Frame::BYTES_PER_PIXEL) {
        px.swap(0, 2);
    }
}

impl Frame {
    /// Convert this frame to `target` ordering, reusing its buffer.
    pub fn into_order(mut self, target: PixelOrder) -> Frame {
        if let Some(conversion) = ColorConversion::between(self.order, target) {
            conversion.apply_in_place(&mut self.data);
            self.order = target;
        }
        self
    }
}
