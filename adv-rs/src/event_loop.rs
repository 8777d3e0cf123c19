//! Main async event loop.
//!
//! ## Architecture
//!
//! A dedicated thread reads stdin and forwards raw bytes through an
//! [`mpsc`] channel to [`EventLoop::run`], which also handles OS signals.
//!
//! ```text
//!   ┌─────────────────────────┐
//!   │  EventLoop::run()       │
//!   │  tokio::select! over:   │
//!   │  • stdin bytes          │◄── stdin thread
//!   │  • SIGWINCH             │
//!   │  • SIGTERM / SIGINT     │
//!   │  • SIGHUP               │
//!   └─────────────────────────┘
//! ```
//!
//! In visual mode the bytes are key presses, decoded by [`KeyDecoder`] and
//! applied to the line editor.  In plain mode they are whole lines, as
//! typed into a cooked terminal or piped in.

use std::io;
use std::time::Instant;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use crate::device::InputDevice;
use crate::input::{EditAction, KeyDecoder, LineInput};
use crate::session::Session;
use crate::terminal::Terminal;

pub type TerminalSession = Session<Terminal, LineInput>;

pub struct EventLoop {
    pub session: TerminalSession,
    key_decoder: KeyDecoder,
    /// Partial line received in plain mode.
    pending_line: Vec<u8>,
}

impl EventLoop {
    pub fn new(session: TerminalSession) -> Self {
        Self { session, key_decoder: KeyDecoder::new(), pending_line: Vec::new() }
    }

    fn visual(&self) -> bool {
        self.session.out.is_visual()
    }

    /// Run until the player quits, stdin closes, or a signal arrives.
    ///
    /// Starts the game, plays `commands` as if typed, then hands control to
    /// the keyboard.
    pub async fn run(&mut self, commands: &[String]) -> io::Result<()> {
        let mut sigwinch = signal(SignalKind::window_change())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sighup = signal(SignalKind::hangup())?;

        // Raw mode only for the visual terminal; restored on drop.
        let _raw = if self.visual() { Some(Terminal::enter_raw_mode()?) } else { None };

        self.session.reset();
        for line in commands {
            self.session.feed_line(line);
        }
        self.session.flush()?;

        // Spawn a dedicated stdin-reading thread.  `tokio::io::stdin()`
        // would leave a blocking read behind every time select! drops it.
        let (stdin_tx, mut stdin_rx) = mpsc::channel::<Vec<u8>>(16);
        std::thread::spawn(move || {
            use std::io::Read;
            let stdin = std::io::stdin();
            let mut guard = stdin.lock();
            let mut buf = [0u8; 256];
            loop {
                match guard.read(&mut buf) {
                    Ok(0) | Err(_) => {
                        // EOF or error: an empty vec is the sentinel.
                        let _ = stdin_tx.blocking_send(vec![]);
                        break;
                    }
                    Ok(n) => {
                        if stdin_tx.blocking_send(buf[..n].to_vec()).is_err() {
                            break; // receiver dropped (event loop exited)
                        }
                    }
                }
            }
        });

        while !self.session.is_quit() {
            tokio::select! {
                Some(bytes) = stdin_rx.recv() => {
                    if bytes.is_empty() {
                        self.end_of_input();
                    } else {
                        self.handle_bytes(&bytes);
                    }
                }

                _ = sigwinch.recv() => {
                    if let Ok((w, h)) = crossterm::terminal::size() {
                        self.session.out.handle_resize(w, h);
                        self.session.redraw_input();
                    }
                }

                _ = sigterm.recv() => self.quit("SIGTERM"),
                _ = sigint.recv()  => self.quit("SIGINT"),
                _ = sighup.recv()  => self.quit("SIGHUP"),
            }
            self.session.flush()?;
        }

        self.session.out.cleanup();
        Ok(())
    }

    fn quit(&mut self, why: &str) {
        tracing::info!(why, "shutting down");
        self.session.quit();
    }

    /// Stdin closed.  A final unterminated line is still played.
    fn end_of_input(&mut self) {
        if !self.pending_line.is_empty() {
            let line = std::mem::take(&mut self.pending_line);
            self.plain_line(&line);
        }
        self.quit("end of input");
    }

    /// Feed bytes read from stdin.
    pub fn handle_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.session.is_quit() {
                return;
            }
            if !self.visual() {
                if b == b'\n' {
                    let line = std::mem::take(&mut self.pending_line);
                    self.plain_line(&line);
                } else {
                    self.pending_line.push(b);
                }
                continue;
            }
            if let Some(action) = self.key_decoder.push(b) {
                self.handle_action(action);
            }
        }
    }

    fn plain_line(&mut self, raw: &[u8]) {
        let text = String::from_utf8_lossy(raw);
        let line = text.trim_end_matches('\r');
        if self.session.is_finished() {
            self.session.press_any_key(Instant::now());
        } else if self.session.input.is_enabled() {
            self.session.submit_line(line);
        }
    }

    fn handle_action(&mut self, action: EditAction) {
        match action {
            EditAction::Interrupt | EditAction::EndOfInput => self.quit("interrupt key"),
            _ if self.session.is_finished() => {
                self.session.press_any_key(Instant::now());
            }
            EditAction::Redraw => self.session.redraw_input(),
            _ => match self.session.input.apply(action) {
                Some(line) => self.session.submit_line(&line),
                None => self.session.redraw_input(),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::load_game;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;
    use std::time::Duration;

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

    const SRC: &str = r#"
        room main :
          on "look" : writeln "A quiet room." end
          on "win" : writeln "Well done.", finish end
        end
    "#;

    fn event_loop(visual: bool) -> (EventLoop, Shared) {
        let buf = Shared::default();
        let mut term = if visual { Terminal::new(buf.clone()) } else { Terminal::plain(buf.clone()) };
        term.handle_resize(80, 24);
        let mut cfg = Config::new();
        cfg.banner = None;
        cfg.finish_pause = Duration::ZERO;
        let mut session = Session::new(cfg, term, LineInput::new());
        session.set_game(load_game([SRC]).unwrap());
        session.reset();
        (EventLoop::new(session), buf)
    }

    #[test]
    fn plain_mode_reads_lines() {
        let (mut el, buf) = event_loop(false);
        el.handle_bytes(b"lo");
        el.handle_bytes(b"ok\r\n");
        el.session.flush().unwrap();
        assert!(buf.text().contains("A quiet room."), "{}", buf.text());
        assert!(!buf.text().contains('\x1b'));
    }

    #[test]
    fn plain_mode_quit_command() {
        let (mut el, _) = event_loop(false);
        el.handle_bytes(b":q\nlook\n");
        assert!(el.session.is_quit());
    }

    #[test]
    fn plain_mode_any_line_restarts_finished_game() {
        let (mut el, _) = event_loop(false);
        el.handle_bytes(b"win\n");
        assert!(el.session.is_finished());
        el.handle_bytes(b"\n");
        assert!(!el.session.is_finished());
        assert!(el.session.input.is_enabled());
    }

    #[test]
    fn end_of_input_plays_last_line_and_quits() {
        let (mut el, buf) = event_loop(false);
        el.handle_bytes(b"look");
        el.end_of_input();
        el.session.flush().unwrap();
        assert!(el.session.is_quit());
        assert!(buf.text().contains("A quiet room."));
    }

    #[test]
    fn visual_mode_decodes_keys() {
        let (mut el, buf) = event_loop(true);
        el.handle_bytes(b"lookx\x7f\r");
        el.session.flush().unwrap();
        assert!(buf.text().contains("A quiet room."), "{}", buf.text());
        assert!(el.session.input.is_enabled());
    }

    #[test]
    fn ctrl_c_quits_in_visual_mode() {
        let (mut el, _) = event_loop(true);
        el.handle_bytes(b"lo\x03ok\r");
        assert!(el.session.is_quit());
    }

    #[test]
    fn key_press_restarts_finished_game() {
        let (mut el, _) = event_loop(true);
        el.handle_bytes(b"win\r");
        assert!(el.session.is_finished());
        el.handle_bytes(b" ");
        assert!(!el.session.is_finished());
        assert!(el.session.input.current_text().is_empty());
    }
}
