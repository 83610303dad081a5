//! Fitting frames into a terminal cell grid.
//!
//! Each terminal cell shows two vertically stacked pixels (an upper half
//! block with separate foreground and background colours). Cells are about
//! twice as tall as they are wide, so a cell-pair of pixels is roughly
//! square and the image keeps its aspect ratio without further correction.

use crate::frame::Frame;

/// Where and how large a frame is drawn, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Left column (0-based)
    pub x: u16,
    /// Top row (0-based)
    pub y: u16,
    /// Width in cells, one pixel per cell
    pub cols: u16,
    /// Height in cells, two pixels per cell
    pub rows: u16,
}

impl Viewport {
    /// Height of the sampled pixel grid.
    pub fn pixel_rows(&self) -> u32 {
        self.rows as u32 * 2
    }
}

/// Largest centred viewport that fits `img_width` x `img_height` into a
/// `cols` x `rows` terminal while preserving aspect ratio.
///
/// Returns `None` when either side has a zero dimension.
pub fn fit_viewport(img_width: u32, img_height: u32, cols: u16, rows: u16) -> Option<Viewport> {
    if img_width == 0 || img_height == 0 || cols == 0 || rows == 0 {
        return None;
    }

    let (img_w, img_h) = (img_width as u64, img_height as u64);
    let max_w = cols as u64;
    let max_h = rows as u64 * 2;

    let (out_w, out_px_h) = if img_w * max_h >= img_h * max_w {
        (max_w, img_h * max_w / img_w)
    } else {
        (img_w * max_h / img_h, max_h)
    };

    let out_w = out_w.clamp(1, max_w) as u16;
    let out_rows = out_px_h.max(1).div_ceil(2).min(rows as u64) as u16;

    Some(Viewport {
        x: (cols - out_w) / 2,
        y: (rows - out_rows) / 2,
        cols: out_w,
        rows: out_rows,
    })
}

/// Average colour of the source pixels covered by output pixel `(ox, oy)`
/// of a `out_w` x `out_h` grid.
pub fn sample(frame: &Frame, ox: u32, oy: u32, out_w: u32, out_h: u32) -> (u8, u8, u8) {
    let (w, h) = (frame.width as u64, frame.height as u64);
    let (out_w, out_h) = (out_w.max(1) as u64, out_h.max(1) as u64);

    let x0 = ox as u64 * w / out_w;
    let x1 = ((ox as u64 + 1) * w / out_w).max(x0 + 1).min(w);
    let y0 = oy as u64 * h / out_h;
    let y1 = ((oy as u64 + 1) * h / out_h).max(y0 + 1).min(h);

    let (mut r, mut g, mut b, mut count) = (0u64, 0u64, 0u64, 0u64);
    for y in y0..y1 {
        for x in x0..x1 {
            let (pr, pg, pb) = frame.rgb_at(x as u32, y as u32);
            r += pr as u64;
            g += pg as u64;
            b += pb as u64;
            count += 1;
        }
    }

    if count == 0 {
        return (0, 0, 0);
    }
    ((r / count) as u8, (g / count) as u8, (b / count) as u8)
}
