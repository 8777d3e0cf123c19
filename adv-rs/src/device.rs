//! Output and input boundaries.
//!
//! The interpreter never touches the terminal directly.  It writes through
//! an [`OutputDevice`]; the session reads lines through an [`InputDevice`].
//! [`Terminal`](crate::terminal::Terminal) and
//! [`LineInput`](crate::input::LineInput) are the real implementations,
//! [`MemoryOutput`] records everything for tests.

use crate::palette::Color;

// ── ColorSpan ─────────────────────────────────────────────────────────────────

/// A run of text in one foreground/background pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpan {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

impl ColorSpan {
    pub fn new(text: impl Into<String>, fg: Color, bg: Color) -> Self {
        Self { text: text.into(), fg, bg }
    }
}

// ── OutputDevice ──────────────────────────────────────────────────────────────

/// A character screen with a cursor and a current color pair.
///
/// Writes are infallible from the caller's point of view; implementations
/// backed by real I/O report failures from [`OutputDevice::flush`].
pub trait OutputDevice {
    fn clear(&mut self);

    fn write_char(&mut self, c: char);

    fn write(&mut self, text: &str);

    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.write_char('\n');
    }

    /// Write `span` in its own colors, then restore the current ones.
    fn write_span(&mut self, span: &ColorSpan) {
        let (fg, bg) = (self.foreground(), self.background());
        self.set_foreground(span.fg);
        self.set_background(span.bg);
        self.write(&span.text);
        self.set_foreground(fg);
        self.set_background(bg);
    }

    fn write_spans(&mut self, spans: &[ColorSpan], newline: bool) {
        for span in spans {
            self.write_span(span);
        }
        if newline {
            self.write_char('\n');
        }
    }

    fn foreground(&self) -> Color;
    fn set_foreground(&mut self, color: Color);
    fn background(&self) -> Color;
    fn set_background(&mut self, color: Color);

    /// `(column, row)`, both 0-based.
    fn cursor(&self) -> (u16, u16);

    fn goto_xy(&mut self, column: u16, row: u16);

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ── InputDevice ───────────────────────────────────────────────────────────────

/// Line-buffered text entry.
///
/// Key handling lives with the implementation; a submitted line is handed
/// back to the caller (see [`LineInput::apply`](crate::input::LineInput::apply)).
pub trait InputDevice {
    /// Text typed so far on the current line.
    fn current_text(&self) -> String;

    /// Cursor position within the current line, in characters.
    fn cursor(&self) -> usize {
        self.current_text().chars().count()
    }

    fn is_enabled(&self) -> bool;

    /// While disabled, keys are ignored and no line is submitted.
    fn set_enabled(&mut self, enabled: bool);

    /// Discard the current line.
    fn reset_input(&mut self);
}

// ── MemoryOutput ──────────────────────────────────────────────────────────────

/// Records output in memory.
#[derive(Debug, Clone)]
pub struct MemoryOutput {
    /// Completed lines, oldest first.
    pub lines: Vec<String>,
    /// Text after the last newline.
    pub current: String,
    /// Every write with the colors it was made in (newlines included).
    pub spans: Vec<ColorSpan>,
    /// How many times the screen was cleared.
    pub clears: usize,
    fg: Color,
    bg: Color,
    column: u16,
    row: u16,
}

impl Default for MemoryOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            spans: Vec::new(),
            clears: 0,
            fg: Color::FOREGROUND,
            bg: Color::BACKGROUND,
            column: 0,
            row: 0,
        }
    }

    /// Everything written since the last clear, pending line included.
    pub fn text(&self) -> String {
        let mut out = self.lines.join("\n");
        if !self.lines.is_empty() {
            out.push('\n');
        }
        out.push_str(&self.current);
        out
    }

    /// Completed lines plus the pending one, if non-empty.
    pub fn all_lines(&self) -> Vec<String> {
        let mut lines = self.lines.clone();
        if !self.current.is_empty() {
            lines.push(self.current.clone());
        }
        lines
    }

    /// Remove and return completed lines.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn record(&mut self, text: &str) {
        match self.spans.last_mut() {
            Some(last) if last.fg == self.fg && last.bg == self.bg => last.text.push_str(text),
            _ => self.spans.push(ColorSpan::new(text, self.fg, self.bg)),
        }
    }
}

impl OutputDevice for MemoryOutput {
    fn clear(&mut self) {
        self.lines.clear();
        self.current.clear();
        self.spans.clear();
        self.clears += 1;
        self.column = 0;
        self.row = 0;
    }

    fn write_char(&mut self, c: char) {
        if c == '\n' {
            self.lines.push(std::mem::take(&mut self.current));
            self.column = 0;
            self.row = self.row.saturating_add(1);
        } else {
            self.current.push(c);
            self.column = self.column.saturating_add(1);
        }
        let mut buf = [0u8; 4];
        self.record(c.encode_utf8(&mut buf));
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
    }

    fn background(&self) -> Color {
        self.bg
    }

    fn set_background(&mut self, color: Color) {
        self.bg = color;
    }

    fn cursor(&self) -> (u16, u16) {
        (self.column, self.row)
    }

    fn goto_xy(&mut self, column: u16, row: u16) {
        self.column = column;
        self.row = row;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_and_cursor() {
        let mut out = MemoryOutput::new();
        out.write("ab\ncd");
        assert_eq!(out.lines, ["ab"]);
        assert_eq!(out.current, "cd");
        assert_eq!(out.cursor(), (2, 1));
        out.write_line("");
        assert_eq!(out.text(), "ab\ncd\n");
    }

    #[test]
    fn spans_restore_colors() {
        let mut out = MemoryOutput::new();
        out.write_spans(
            &[
                ColorSpan::new("warn", Color::BrightYellow, Color::Blue),
                ColorSpan::new("!", Color::White, Color::Black),
            ],
            true,
        );
        assert_eq!(out.foreground(), Color::White);
        assert_eq!(out.background(), Color::Black);
        assert_eq!(out.spans[0], ColorSpan::new("warn", Color::BrightYellow, Color::Blue));
        assert_eq!(out.spans[1], ColorSpan::new("!\n", Color::White, Color::Black));
    }

    #[test]
    fn clear_resets_everything() {
        let mut out = MemoryOutput::new();
        out.write_line("x");
        out.clear();
        assert_eq!(out.text(), "");
        assert_eq!(out.clears, 1);
        assert_eq!(out.cursor(), (0, 0));
    }

    #[test]
    fn goto_moves_cursor() {
        let mut out = MemoryOutput::new();
        out.goto_xy(5, 3);
        assert_eq!(out.cursor(), (5, 3));
    }
}
