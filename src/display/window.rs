//! Native window surface backed by minifb.

use std::time::Duration;

use minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions};

use super::{DisplayError, KeyCode, Surface};
use crate::camera::Resolution;
use crate::frame::{Frame, PixelOrder};

/// A named, resizable window.
///
/// minifb takes one `u32` per pixel laid out as `0x00RRGGBB`. On
/// little-endian bytes that is `B, G, R, 0`, so the surface asks for BGR
/// frames and packs each pixel with a single `from_le_bytes`.
pub struct WindowSurface {
    title: String,
    /// The open window, `None` once destroyed
    window: Option<Window>,
    /// Reused packed-pixel buffer
    buffer: Vec<u32>,
}

impl WindowSurface {
    /// Create a window titled `title` with an initial client size.
    pub fn open(title: &str, size: Resolution) -> Result<Self, DisplayError> {
        let window = Window::new(
            title,
            size.width as usize,
            size.height as usize,
            WindowOptions {
                resize: true,
                scale_mode: ScaleMode::AspectRatioStretch,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| DisplayError::Window(e.to_string()))?;

        log::debug!("Window '{}' open at {}", title, size);
        Ok(Self {
            title: title.to_string(),
            window: Some(window),
            buffer: Vec::new(),
        })
    }

    fn window_mut(&mut self) -> Result<&mut Window, DisplayError> {
        self.window
            .as_mut()
            .ok_or_else(|| DisplayError::Window(format!("window '{}' already closed", self.title)))
    }
}

impl Surface for WindowSurface {
    fn name(&self) -> &str {
        &self.title
    }

    fn pixel_order(&self) -> PixelOrder {
        PixelOrder::Bgr
    }

    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let mut buffer = std::mem::take(&mut self.buffer);
        pack_bgr_into(&frame.data, &mut buffer);

        let result = self
            .window_mut()?
            .update_with_buffer(&buffer, frame.width as usize, frame.height as usize)
            .map_err(|e| DisplayError::Window(e.to_string()));
        self.buffer = buffer;
        result
    }

    fn poll_key(&mut self, wait: Duration) -> Result<Option<KeyCode>, DisplayError> {
        // minifb has no blocking event wait; sleep, then pump events once.
        std::thread::sleep(wait);
        let window = self.window_mut()?;
        window.update();

        if !window.is_open() {
            return Ok(Some(KeyCode::Close));
        }
        Ok(window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .next()
            .map(map_key))
    }

    fn destroy(&mut self) {
        if self.window.take().is_some() {
            log::debug!("Window '{}' closed", self.title);
        }
    }
}

impl Drop for WindowSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Pack BGR bytes into `0x00RRGGBB` words.
pub fn pack_bgr_into(data: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(
        data.chunks_exact(Frame::BYTES_PER_PIXEL)
            .map(|p| u32::from_le_bytes([p[0], p[1], p[2], 0])),
    );
}

/// Translate a minifb key.
pub fn map_key(key: Key) -> KeyCode {
    const LETTERS: [(Key, char); 26] = [
        (Key::A, 'a'),
        (Key::B, 'b'),
        (Key::C, 'c'),
        (Key::D, 'd'),
        (Key::E, 'e'),
        (Key::F, 'f'),
        (Key::G, 'g'),
        (Key::H, 'h'),
        (Key::I, 'i'),
        (Key::J, 'j'),
        (Key::K, 'k'),
        (Key::L, 'l'),
        (Key::M, 'm'),
        (Key::N, 'n'),
        (Key::O, 'o'),
        (Key::P, 'p'),
        (Key::Q, 'q'),
        (Key::R, 'r'),
        (Key::S, 's'),
        (Key::T, 't'),
        (Key::U, 'u'),
        (Key::V, 'v'),
        (Key::W, 'w'),
        (Key::X, 'x'),
        (Key::Y, 'y'),
        (Key::Z, 'z'),
    ];
    const DIGITS: [(Key, char); 10] = [
        (Key::Key0, '0'),
        (Key::Key1, '1'),
        (Key::Key2, '2'),
        (Key::Key3, '3'),
        (Key::Key4, '4'),
        (Key::Key5, '5'),
        (Key::Key6, '6'),
        (Key::Key7, '7'),
        (Key::Key8, '8'),
        (Key::Key9, '9'),
    ];

    match key {
        Key::Escape => KeyCode::Escape,
        Key::Space => KeyCode::Char(' '),
        _ => LETTERS
            .iter()
            .chain(DIGITS.iter())
            .find(|(k, _)| *k == key)
            .map(|&(_, c)| KeyCode::Char(c))
            .unwrap_or(KeyCode::Other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_bgr_single_pixel() {
        // Red pixel in BGR order
        let mut out = Vec::new();
        pack_bgr_into(&[0, 0, 255], &mut out);
        assert_eq!(out, vec![0x00FF0000]);
    }

    #[test]
    fn test_pack_bgr_2x1() {
        // Blue then green
        let mut out = Vec::new();
        pack_bgr_into(&[255, 0, 0, 0, 255, 0], &mut out);
        assert_eq!(out, vec![0x000000FF, 0x0000FF00]);
    }

    #[test]
    fn test_pack_bgr_reuses_buffer() {
        let mut out = vec![1, 2, 3, 4];
        pack_bgr_into(&[255, 255, 255], &mut out);
        assert_eq!(out, vec![0x00FFFFFF]);
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(Key::Q), KeyCode::Char('q'));
        assert_eq!(map_key(Key::Key7), KeyCode::Char('7'));
        assert_eq!(map_key(Key::Escape), KeyCode::Escape);
        assert_eq!(map_key(Key::Enter), KeyCode::Other);
    }
}
