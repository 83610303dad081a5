//! Terminal surface: frames drawn as true-colour half blocks.

use std::io::{self, Stdout, Write};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode as TermKey, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen, SetTitle,
};
use crossterm::{execute, queue};

use super::layout::{fit_viewport, sample, Viewport};
use super::{DisplayError, KeyCode, Surface};
use crate::frame::{Frame, PixelOrder};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

/// Set while the terminal is in raw mode on the alternate screen, so the
/// panic hook knows whether it has anything to restore.
static TERMINAL_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Frame sink that takes over the terminal.
///
/// Opening enters raw mode and the alternate screen and hides the cursor;
/// `destroy` (or drop, or a panic) puts everything back.
pub struct TerminalSurface {
    title: String,
    stdout: Stdout,
    /// Whether this surface still owns the terminal
    active: bool,
    /// Set on resize; the next `show` clears stale cells
    needs_clear: bool,
    /// Reused escape-sequence buffer
    buf: Vec<u8>,
}

impl TerminalSurface {
    /// Take over the terminal and title it `title`.
    pub fn open(title: &str) -> Result<Self, DisplayError> {
        install_panic_hook();

        enable_raw_mode()?;
        TERMINAL_ACTIVE.store(true, Ordering::SeqCst);

        let mut stdout = io::stdout();
        if let Err(e) = execute!(
            stdout,
            EnterAlternateScreen,
            Hide,
            SetTitle(title),
            Clear(ClearType::All)
        ) {
            restore_terminal(&mut stdout);
            return Err(e.into());
        }

        log::debug!("Terminal surface '{}' open", title);
        Ok(Self {
            title: title.to_string(),
            stdout,
            active: true,
            needs_clear: false,
            buf: Vec::new(),
        })
    }
}

impl Surface for TerminalSurface {
    fn name(&self) -> &str {
        &self.title
    }

    fn pixel_order(&self) -> PixelOrder {
        PixelOrder::Rgb
    }

    fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let (cols, rows) = terminal::size()?;

        self.buf.clear();
        if self.needs_clear {
            queue!(self.buf, ResetColor, Clear(ClearType::All))?;
            self.needs_clear = false;
        }
        if let Some(viewport) = fit_viewport(frame.width, frame.height, cols, rows) {
            render_half_blocks(frame, viewport, &mut self.buf)?;
        }

        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn poll_key(&mut self, wait: Duration) -> Result<Option<KeyCode>, DisplayError> {
        if !event::poll(wait)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(map_key(key))),
            Event::Resize(..) => {
                self.needs_clear = true;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn destroy(&mut self) {
        if self.active {
            self.active = false;
            restore_terminal(&mut self.stdout);
            log::debug!("Terminal surface '{}' closed", self.title);
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Translate a crossterm key event.
pub fn map_key(key: KeyEvent) -> KeyCode {
    match key.code {
        TermKey::Char('c') | TermKey::Char('C')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            KeyCode::Interrupt
        }
        TermKey::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        TermKey::Esc => KeyCode::Escape,
        _ => KeyCode::Other,
    }
}

/// Queue the escape sequences that draw `frame` into `viewport`.
///
/// Colour changes are only emitted when a cell differs from its left
/// neighbour, which keeps flat regions cheap.
pub fn render_half_blocks<W: Write>(
    frame: &Frame,
    viewport: Viewport,
    out: &mut W,
) -> io::Result<()> {
    let out_w = viewport.cols as u32;
    let out_h = viewport.pixel_rows();

    for row in 0..viewport.rows {
        queue!(out, MoveTo(viewport.x, viewport.y + row))?;
        let mut last: Option<((u8, u8, u8), (u8, u8, u8))> = None;

        for col in 0..viewport.cols {
            let top = sample(frame, col as u32, row as u32 * 2, out_w, out_h);
            let bottom = sample(frame, col as u32, row as u32 * 2 + 1, out_w, out_h);

            let (prev_top, prev_bottom) = last.unzip();
            if prev_top != Some(top) {
                queue!(out, SetForegroundColor(rgb(top)))?;
            }
            if prev_bottom != Some(bottom) {
                queue!(out, SetBackgroundColor(rgb(bottom)))?;
            }
            queue!(out, Print(HALF_BLOCK))?;
            last = Some((top, bottom));
        }
        queue!(out, ResetColor)?;
    }
    Ok(())
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb { r, g, b }
}

/// Best-effort: leave the alternate screen, show the cursor, drop raw mode.
fn restore_terminal(stdout: &mut Stdout) {
    if let Err(e) = execute!(stdout, ResetColor, Show, LeaveAlternateScreen) {
        log::warn!("Failed to restore terminal screen: {}", e);
    }
    if let Err(e) = disable_raw_mode() {
        log::warn!("Failed to disable raw mode: {}", e);
    }
    TERMINAL_ACTIVE.store(false, Ordering::SeqCst);
}

/// Install a panic hook that restores the terminal before the panic message
/// is printed. Installed at most once per process.
fn install_panic_hook() {
    static HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

    if HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        if TERMINAL_ACTIVE.swap(false, Ordering::SeqCst) {
            let _ = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
        original_hook(panic_info);
    }));
}
