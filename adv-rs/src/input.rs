//! Keyboard input: byte decoding, the line editor, and the
//! [`InputDevice`] the session reads lines from.
//!
//! ## Pipeline
//!
//! ```text
//!   raw stdin bytes ──► KeyDecoder ──► EditAction ──► LineInput::apply ──► Some(line)
//! ```
//!
//! The buffer is a `Vec<char>` so that cursor movement and editing work in
//! Unicode characters rather than bytes.

use crate::device::InputDevice;

// ── EditAction ────────────────────────────────────────────────────────────────

/// One decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Insert this character at the cursor.
    InsertChar(char),
    /// Backspace (delete before cursor).
    Backspace,
    /// Forward delete (delete at cursor).
    DeleteForward,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    /// Kill to end of line (`C-k`).
    KillToEnd,
    /// Kill to start of line (`C-u`).
    KillToStart,
    /// Kill the word before the cursor (`C-w`).
    KillWordBackward,
    /// Submit the line (`Enter`, `C-j`).
    Newline,
    /// Repaint the input line (`C-l`).
    Redraw,
    /// `C-c`.
    Interrupt,
    /// `C-d`.
    EndOfInput,
}

// ── KeyDecoder ────────────────────────────────────────────────────────────────

/// Escape sequences the decoder understands, and what they mean.
const SEQUENCES: &[(&[u8], EditAction)] = &[
    (b"\x1b[C", EditAction::MoveRight),
    (b"\x1b[D", EditAction::MoveLeft),
    (b"\x1b[H", EditAction::MoveHome),
    (b"\x1b[F", EditAction::MoveEnd),
    (b"\x1bOH", EditAction::MoveHome),
    (b"\x1bOF", EditAction::MoveEnd),
    (b"\x1b[1~", EditAction::MoveHome),
    (b"\x1b[4~", EditAction::MoveEnd),
    (b"\x1b[3~", EditAction::DeleteForward),
];

/// Longest escape sequence in [`SEQUENCES`].
const MAX_SEQUENCE: usize = 4;

/// Accumulates raw bytes from stdin and translates them into [`EditAction`]s.
///
/// Multi-byte escape sequences (e.g. `ESC [ D` for Left Arrow) and UTF-8
/// characters are buffered until complete.  Unknown sequences are dropped.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    buf: Vec<u8>,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one byte, returning an `EditAction` if a complete key was
    /// recognised, or `None` while more bytes are expected.
    pub fn push(&mut self, b: u8) -> Option<EditAction> {
        self.buf.push(b);

        if self.buf[0] == 0x1b {
            if let Some(&(_, action)) = SEQUENCES.iter().find(|(seq, _)| *seq == self.buf.as_slice()) {
                self.buf.clear();
                return Some(action);
            }
            let pending = self.buf.len() < MAX_SEQUENCE
                && SEQUENCES.iter().any(|(seq, _)| seq.starts_with(&self.buf));
            if !pending {
                self.buf.clear();
            }
            return None;
        }

        if self.buf[0] >= 0x80 {
            return match std::str::from_utf8(&self.buf) {
                Ok(s) => {
                    let ch = s.chars().next();
                    self.buf.clear();
                    ch.map(EditAction::InsertChar)
                }
                Err(e) if e.error_len().is_none() => None,
                Err(_) => {
                    self.buf.clear();
                    None
                }
            };
        }

        self.buf.clear();
        match b {
            b'\r' | b'\n' => Some(EditAction::Newline),
            0x7f | 0x08 => Some(EditAction::Backspace),
            0x01 => Some(EditAction::MoveHome),
            0x02 => Some(EditAction::MoveLeft),
            0x03 => Some(EditAction::Interrupt),
            0x04 => Some(EditAction::EndOfInput),
            0x05 => Some(EditAction::MoveEnd),
            0x06 => Some(EditAction::MoveRight),
            0x0b => Some(EditAction::KillToEnd),
            0x0c => Some(EditAction::Redraw),
            0x15 => Some(EditAction::KillToStart),
            0x17 => Some(EditAction::KillWordBackward),
            b'\t' => Some(EditAction::InsertChar(' ')),
            b if b.is_ascii_control() => None,
            b => Some(EditAction::InsertChar(b as char)),
        }
    }
}

// ── LineEditor ────────────────────────────────────────────────────────────────

/// A readline-style line editor backed by a `Vec<char>`.
///
/// All positions are in Unicode scalar values (chars), not bytes.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    buffer: Vec<char>,
    /// Cursor position (0 = before first char, `buffer.len()` = after last).
    pub pos: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Consume and return the buffer contents, resetting the editor to empty.
    pub fn take_line(&mut self) -> String {
        let line = self.text();
        self.clear();
        line
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pos = 0;
    }

    /// Insert `ch` at the cursor, advancing the cursor.
    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.pos, ch);
        self.pos += 1;
    }

    /// Delete the character immediately before the cursor (backspace).
    /// Returns `true` if a character was deleted.
    pub fn delete_before(&mut self) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos -= 1;
        self.buffer.remove(self.pos);
        true
    }

    /// Delete the character under the cursor.
    pub fn delete_at(&mut self) -> bool {
        if self.pos >= self.buffer.len() {
            return false;
        }
        self.buffer.remove(self.pos);
        true
    }

    pub fn move_left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.pos = (self.pos + 1).min(self.buffer.len());
    }

    pub fn move_home(&mut self) {
        self.pos = 0;
    }

    pub fn move_end(&mut self) {
        self.pos = self.buffer.len();
    }

    pub fn kill_to_end(&mut self) {
        self.buffer.truncate(self.pos);
    }

    pub fn kill_to_start(&mut self) {
        self.buffer.drain(..self.pos);
        self.pos = 0;
    }

    /// Delete back to the start of the previous word.
    pub fn kill_word_backward(&mut self) {
        let mut start = self.pos;
        while start > 0 && !self.buffer[start - 1].is_alphanumeric() {
            start -= 1;
        }
        while start > 0 && self.buffer[start - 1].is_alphanumeric() {
            start -= 1;
        }
        self.buffer.drain(start..self.pos);
        self.pos = start;
    }
}

// ── LineInput ─────────────────────────────────────────────────────────────────

/// The keyboard [`InputDevice`]: a [`LineEditor`] plus an enable switch.
#[derive(Debug, Clone, Default)]
pub struct LineInput {
    pub editor: LineEditor,
    enabled: bool,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an edit.  Returns `Some(line)` when a line is submitted.
    ///
    /// While disabled every action is ignored.  Actions that concern the
    /// host (`Redraw`, `Interrupt`, `EndOfInput`) are not handled here.
    pub fn apply(&mut self, action: EditAction) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let ed = &mut self.editor;
        match action {
            EditAction::InsertChar(ch) => ed.insert_char(ch),
            EditAction::Backspace => {
                ed.delete_before();
            }
            EditAction::DeleteForward => {
                ed.delete_at();
            }
            EditAction::MoveLeft => ed.move_left(),
            EditAction::MoveRight => ed.move_right(),
            EditAction::MoveHome => ed.move_home(),
            EditAction::MoveEnd => ed.move_end(),
            EditAction::KillToEnd => ed.kill_to_end(),
            EditAction::KillToStart => ed.kill_to_start(),
            EditAction::KillWordBackward => ed.kill_word_backward(),
            EditAction::Newline => return Some(ed.take_line()),
            EditAction::Redraw | EditAction::Interrupt | EditAction::EndOfInput => {}
        }
        None
    }
}

impl InputDevice for LineInput {
    fn current_text(&self) -> String {
        self.editor.text()
    }

    fn cursor(&self) -> usize {
        self.editor.pos
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn reset_input(&mut self) {
        self.editor.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<EditAction> {
        let mut kd = KeyDecoder::new();
        bytes.iter().filter_map(|&b| kd.push(b)).collect()
    }

    fn typed(input: &mut LineInput, text: &str) {
        for ch in text.chars() {
            input.apply(EditAction::InsertChar(ch));
        }
    }

    #[test]
    fn key_decoder_printable_ascii() {
        assert_eq!(decode(b"aZ"), [EditAction::InsertChar('a'), EditAction::InsertChar('Z')]);
    }

    #[test]
    fn key_decoder_enter() {
        assert_eq!(decode(b"\r"), [EditAction::Newline]);
        assert_eq!(decode(b"\n"), [EditAction::Newline]);
    }

    #[test]
    fn key_decoder_arrows_wait_for_the_whole_sequence() {
        let mut kd = KeyDecoder::new();
        assert_eq!(kd.push(0x1b), None);
        assert_eq!(kd.push(b'['), None);
        assert_eq!(kd.push(b'D'), Some(EditAction::MoveLeft));
        assert_eq!(decode(b"\x1b[3~"), [EditAction::DeleteForward]);
    }

    #[test]
    fn key_decoder_drops_unknown_sequences() {
        assert_eq!(decode(b"\x1b[Ax"), [EditAction::InsertChar('x')]);
    }

    #[test]
    fn key_decoder_utf8() {
        assert_eq!(decode("é€".as_bytes()), [EditAction::InsertChar('é'), EditAction::InsertChar('€')]);
        assert_eq!(decode(&[0xff, b'a']), [EditAction::InsertChar('a')]);
    }

    #[test]
    fn key_decoder_controls() {
        assert_eq!(
            decode(&[0x7f, 0x03, 0x04, 0x15, 0x17, 0x0c]),
            [
                EditAction::Backspace,
                EditAction::Interrupt,
                EditAction::EndOfInput,
                EditAction::KillToStart,
                EditAction::KillWordBackward,
                EditAction::Redraw,
            ]
        );
    }

    #[test]
    fn editing() {
        let mut ed = LineEditor::new();
        for ch in "hllo".chars() {
            ed.insert_char(ch);
        }
        ed.move_home();
        ed.move_right();
        ed.insert_char('e');
        assert_eq!(ed.text(), "hello");
        assert_eq!(ed.pos, 2);
        ed.move_end();
        assert!(ed.delete_before());
        assert!(!ed.delete_at());
        assert_eq!(ed.text(), "hell");
    }

    #[test]
    fn kills() {
        let mut ed = LineEditor::new();
        for ch in "go north now".chars() {
            ed.insert_char(ch);
        }
        ed.kill_word_backward();
        assert_eq!(ed.text(), "go north ");
        ed.kill_word_backward();
        assert_eq!(ed.text(), "go ");
        ed.move_left();
        ed.kill_to_end();
        assert_eq!(ed.text(), "go");
        ed.kill_to_start();
        assert!(ed.is_empty());
    }

    #[test]
    fn disabled_input_ignores_keys() {
        let mut input = LineInput::new();
        typed(&mut input, "look");
        assert_eq!(input.current_text(), "");
        assert_eq!(input.apply(EditAction::Newline), None);
    }

    #[test]
    fn submit_returns_line_and_clears() {
        let mut input = LineInput::new();
        input.set_enabled(true);
        typed(&mut input, "look");
        assert_eq!(input.cursor(), 4);
        assert_eq!(input.apply(EditAction::Newline).as_deref(), Some("look"));
        assert_eq!(input.current_text(), "");
        typed(&mut input, "x");
        input.reset_input();
        assert_eq!(input.current_text(), "");
    }
}
