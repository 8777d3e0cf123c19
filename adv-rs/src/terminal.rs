//! Terminal output: a crossterm-backed [`OutputDevice`].
//!
//! ## Modes
//!
//! * **visual**: raw mode, palette colors, cursor addressing, `\r\n` line
//!   ends.  The session owns the whole screen.
//! * **plain**: no escape sequences at all; text goes out as-is with `\n`
//!   line ends.  Used with `-v` and when stdin/stdout is not a terminal.
//!
//! Writes are queued and only reach the terminal on [`OutputDevice::flush`].
//! The first I/O error is kept and returned from the next flush.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::device::OutputDevice;
use crate::palette::Color;

// ── Terminal ──────────────────────────────────────────────────────────────────

pub struct Terminal {
    /// Terminal width in columns.
    pub width: u16,
    /// Terminal height in rows.
    pub height: u16,
    visual: bool,
    fg: Color,
    bg: Color,
    column: u16,
    row: u16,
    out: Box<dyn Write>,
    error: Option<io::Error>,
}

impl Terminal {
    /// A visual terminal writing to `out`.
    ///
    /// Queries the current terminal size; falls back to 80×24 if unavailable.
    pub fn new(out: impl Write + 'static) -> Self {
        let (width, height) = terminal::size().unwrap_or((80, 24));
        Self {
            width,
            height,
            visual: true,
            fg: Color::FOREGROUND,
            bg: Color::BACKGROUND,
            column: 0,
            row: 0,
            out: Box::new(out),
            error: None,
        }
    }

    /// A plain-text terminal writing to `out`.
    pub fn plain(out: impl Write + 'static) -> Self {
        Self { visual: false, ..Self::new(out) }
    }

    pub fn is_visual(&self) -> bool {
        self.visual
    }

    /// Enable raw mode.  Returns a guard that disables it on drop.
    pub fn enter_raw_mode() -> io::Result<RawModeGuard> {
        terminal::enable_raw_mode()?;
        Ok(RawModeGuard(()))
    }

    /// Update stored dimensions after a `SIGWINCH` / resize event.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.column = self.column.min(self.width - 1);
        self.row = self.row.min(self.height - 1);
    }

    /// Reset colors and leave the cursor on a fresh line.
    pub fn cleanup(&mut self) {
        if self.visual {
            let r = queue!(self.out, crossterm::style::ResetColor, Print("\r\n"));
            self.keep(r);
        }
        // Nothing useful to do with an error at this point.
        let _ = OutputDevice::flush(self);
    }

    /// Remember the first failure; later writes are still attempted.
    fn keep(&mut self, r: io::Result<()>) {
        if let Err(e) = r {
            self.error.get_or_insert(e);
        }
    }

    fn newline(&mut self) {
        let r = if self.visual {
            queue!(self.out, Print("\r\n"))
        } else {
            self.out.write_all(b"\n")
        };
        self.keep(r);
        self.column = 0;
        self.row = (self.row + 1).min(self.height.saturating_sub(1));
    }

    fn advance(&mut self) {
        self.column += 1;
        if self.column >= self.width {
            self.column = 0;
            self.row = (self.row + 1).min(self.height.saturating_sub(1));
        }
    }
}

impl OutputDevice for Terminal {
    fn clear(&mut self) {
        if self.visual {
            let r = queue!(
                self.out,
                SetBackgroundColor(self.bg.ansi()),
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0)
            );
            self.keep(r);
        }
        self.column = 0;
        self.row = 0;
    }

    fn write_char(&mut self, c: char) {
        match c {
            '\n' => self.newline(),
            c if c.is_control() && c != '\t' => {}
            c => {
                let mut buf = [0u8; 4];
                let r = self.out.write_all(c.encode_utf8(&mut buf).as_bytes());
                self.keep(r);
                self.advance();
            }
        }
    }

    fn write(&mut self, text: &str) {
        for c in text.chars() {
            self.write_char(c);
        }
    }

    fn foreground(&self) -> Color {
        self.fg
    }

    fn set_foreground(&mut self, color: Color) {
        self.fg = color;
        if self.visual {
            let r = queue!(self.out, SetForegroundColor(color.ansi()));
            self.keep(r);
        }
    }

    fn background(&self) -> Color {
        self.bg
    }

    fn set_background(&mut self, color: Color) {
        self.bg = color;
        if self.visual {
            let r = queue!(self.out, SetBackgroundColor(color.ansi()));
            self.keep(r);
        }
    }

    fn cursor(&self) -> (u16, u16) {
        (self.column, self.row)
    }

    fn goto_xy(&mut self, column: u16, row: u16) {
        self.column = column.min(self.width.saturating_sub(1));
        self.row = row.min(self.height.saturating_sub(1));
        if self.visual {
            let r = queue!(self.out, cursor::MoveTo(self.column, self.row));
            self.keep(r);
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let flushed = self.out.flush();
        match self.error.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }
}

// ── RawModeGuard ──────────────────────────────────────────────────────────────

/// RAII guard: disables raw mode when dropped.
pub struct RawModeGuard(());

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A `Write` whose contents the test can read back.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn plain() -> (Terminal, Shared) {
        let buf = Shared::default();
        let mut t = Terminal::plain(buf.clone());
        t.handle_resize(80, 24);
        (t, buf)
    }

    #[test]
    fn plain_mode_has_no_escapes() {
        let (mut t, buf) = plain();
        t.set_foreground(Color::Red);
        t.clear();
        t.write_line("hello");
        t.write_span(&crate::device::ColorSpan::new("x", Color::Blue, Color::White));
        t.flush().unwrap();
        assert_eq!(buf.text(), "hello\nx");
        assert_eq!(t.foreground(), Color::Red);
    }

    #[test]
    fn visual_mode_uses_crlf_and_colors() {
        let buf = Shared::default();
        let mut t = Terminal::new(buf.clone());
        t.handle_resize(80, 24);
        t.set_foreground(Color::BrightYellow);
        t.write_line("hi");
        t.flush().unwrap();
        let text = buf.text();
        assert!(text.contains('\x1b'));
        assert!(text.ends_with("hi\r\n"));
    }

    #[test]
    fn cursor_tracks_and_wraps() {
        let (mut t, _) = plain();
        t.handle_resize(4, 3);
        t.write("abcde");
        assert_eq!(t.cursor(), (1, 1));
        t.write("\n\n\n");
        assert_eq!(t.cursor(), (0, 2));
        t.goto_xy(99, 1);
        assert_eq!(t.cursor(), (3, 1));
    }

    #[test]
    fn control_characters_are_dropped() {
        let (mut t, buf) = plain();
        t.write("a\u{7}b\u{0}c");
        t.flush().unwrap();
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn errors_surface_on_flush() {
        let mut t = Terminal::plain(Broken);
        t.write("x");
        t.write("y");
        assert_eq!(t.flush().unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert!(t.flush().is_ok());
    }
}
