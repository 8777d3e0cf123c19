//! Script tokenizer.
//!
//! A character-at-a-time state machine that splits script text into string
//! tokens.  Tokens are extended greedily: a character joins the pending
//! token only while the result is still a prefix of some token class (see
//! [`symbol::is_token_prefix`]), otherwise the pending token is emitted and
//! a new one begins.  String literals and comments are kept verbatim,
//! quotes and `#` included; escape sequences are resolved later by the
//! parser.

use super::error::ScriptError;
use super::symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    /// Inside a string opened by the given quote character.
    Str(char),
    /// Just after a backslash inside a string.
    StrEscape(char),
    Comment,
}

struct Lexer {
    state: State,
    pending: String,
    tokens: Vec<String>,
}

/// Split `text` into tokens.
///
/// Carriage returns are dropped before anything else looks at them.
pub fn tokenize(text: &str) -> Result<Vec<String>, ScriptError> {
    let mut lx = Lexer { state: State::Normal, pending: String::new(), tokens: Vec::new() };
    for c in text.chars().filter(|&c| c != '\r') {
        lx.feed(c)?;
    }
    lx.finish()
}

impl Lexer {
    fn feed(&mut self, c: char) -> Result<(), ScriptError> {
        match self.state {
            State::Normal => self.feed_normal(c)?,
            State::Str(quote) => {
                self.pending.push(c);
                if c == quote {
                    self.emit();
                    self.state = State::Normal;
                } else if c == '\\' {
                    self.state = State::StrEscape(quote);
                }
            }
            State::StrEscape(quote) => {
                self.pending.push(c);
                self.state = State::Str(quote);
            }
            State::Comment => {
                if c == '\n' {
                    self.emit();
                    self.state = State::Normal;
                } else {
                    self.pending.push(c);
                }
            }
        }
        Ok(())
    }

    fn feed_normal(&mut self, c: char) -> Result<(), ScriptError> {
        if c.is_whitespace() {
            return self.flush();
        }
        if c == '#' {
            self.flush()?;
            self.pending.push(c);
            self.state = State::Comment;
            return Ok(());
        }
        if symbol::is_quote(c) {
            self.flush()?;
            self.pending.push(c);
            self.state = State::Str(c);
            return Ok(());
        }

        if self.extends(c) {
            self.pending.push(c);
            return Ok(());
        }

        // `1.` cannot grow into `1..`; hand the dot to the next token so
        // that `1..3` reads as `1`, `..`, `3`.
        if let Some(number) = self.pending.strip_suffix('.') {
            if symbol::is_integer(number) {
                let number = number.to_owned();
                self.tokens.push(number);
                self.pending = ".".to_owned();
                if self.extends(c) {
                    self.pending.push(c);
                    return Ok(());
                }
            }
        }

        self.flush()?;
        self.pending.push(c);
        if !symbol::is_token_prefix(&self.pending) {
            return Err(ScriptError::Lexical { token: self.pending.clone() });
        }
        Ok(())
    }

    fn extends(&self, c: char) -> bool {
        let mut candidate = String::with_capacity(self.pending.len() + c.len_utf8());
        candidate.push_str(&self.pending);
        candidate.push(c);
        symbol::is_token_prefix(&candidate)
    }

    /// Emit the pending normal-state token, which must be complete.
    fn flush(&mut self) -> Result<(), ScriptError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        if symbol::is_token(&self.pending) {
            self.emit();
            return Ok(());
        }
        match self.pending.strip_suffix('.') {
            Some(number) if symbol::is_integer(number) => {
                let number = number.to_owned();
                self.tokens.push(number);
                self.tokens.push(".".to_owned());
                self.pending.clear();
                Ok(())
            }
            _ => Err(ScriptError::Lexical { token: self.pending.clone() }),
        }
    }

    fn emit(&mut self) {
        if !self.pending.is_empty() {
            self.tokens.push(std::mem::take(&mut self.pending));
        }
    }

    fn finish(mut self) -> Result<Vec<String>, ScriptError> {
        match self.state {
            State::Normal => self.flush()?,
            State::Comment => self.emit(),
            State::Str(_) | State::StrEscape(_) => {
                return Err(ScriptError::Lexical { token: self.pending });
            }
        }
        tracing::trace!(count = self.tokens.len(), "tokenized script");
        Ok(self.tokens)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
