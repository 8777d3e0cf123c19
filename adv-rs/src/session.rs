//! One play session: the host side of a loaded adventure.
//!
//! A [`Session`] owns the [`Game`], the current [`Context`] and the two
//! device boundaries.  The event loop feeds it key presses and submitted
//! lines; the session opens prompts, dispatches input to the interpreter,
//! follows room changes and restarts finished games.
//!
//! Script errors never end the session: the message is printed, logged,
//! and play continues from whatever state the script left behind.

use std::io;
use std::time::Instant;

use crate::config::Config;
use crate::context::{Context, ScriptAction};
use crate::device::{InputDevice, OutputDevice};
use crate::palette::Color;
use crate::script::{parse_script, Interpreter, ScriptError};
use crate::world::Game;

/// Shown after a script fails to load.
pub const NO_GAME: &str = "no game loaded";

/// Room changes and restarts allowed between two prompts.  Scripts whose
/// rooms keep sending the player on (or keep resetting) stop here.
const MAX_TRANSITIONS: usize = 1000;

/// Parse `sources` in order and merge them into one game.  A room or
/// object declared in more than one source keeps its first declaration.
pub fn load_game<'s>(sources: impl IntoIterator<Item = &'s str>) -> Result<Game, ScriptError> {
    let mut game = Game::new();
    for text in sources {
        game.add_from(parse_script(text)?);
    }
    Ok(game)
}

/// Whether `line` is the host's quit command.
pub fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), ":q" | ":quit")
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct Session<O: OutputDevice, I: InputDevice> {
    pub out: O,
    pub input: I,
    config: Config,
    game: Option<Game>,
    ctx: Context,
    quit: bool,
    finished_at: Option<Instant>,
    /// Foreground in effect before the prompt recolored it.
    prev_fg: Color,
    /// Screen position where the input line starts.
    input_origin: (u16, u16),
    /// Characters the last redraw left on screen.
    drawn: usize,
}

impl<O: OutputDevice, I: InputDevice> Session<O, I> {
    pub fn new(config: Config, out: O, mut input: I) -> Self {
        input.set_enabled(false);
        let mut ctx = Context::new();
        ctx.run_all = config.run_all;
        Self {
            prev_fg: out.foreground(),
            out,
            input,
            config,
            game: None,
            ctx,
            quit: false,
            finished_at: None,
            input_origin: (0, 0),
            drawn: 0,
        }
    }

    pub fn set_game(&mut self, game: Game) {
        tracing::info!(
            rooms = game.rooms().count(),
            objects = game.objects().count(),
            "game loaded"
        );
        self.game = Some(game);
    }

    /// Drop any game and show why.
    pub fn fail_load(&mut self, message: &str) {
        tracing::error!(message, "load failed");
        self.game = None;
        self.out.write_line(message);
        self.out.write_line(NO_GAME);
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_quit(&self) -> bool {
        self.quit
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }

    /// The game has finished and is waiting for a key press.
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Start (or restart) the game and open the first prompt.
    pub fn reset(&mut self) {
        self.restart();
        self.step();
    }

    fn restart(&mut self) {
        self.finished_at = None;
        self.input.set_enabled(false);
        self.ctx = Context::new();
        self.ctx.run_all = self.config.run_all;
        if self.game.is_none() {
            return;
        }

        self.out.set_background(Color::Black);
        self.out.set_foreground(Color::White);
        self.out.clear();
        if let Some(banner) = &self.config.banner {
            self.out.write_line(banner);
            self.out.write_line("");
        }

        let start = self.config.start_room.clone();
        tracing::info!(room = %start, "game start");
        self.with_interp(|interp| interp.change_room(&start));
    }

    /// Follow pending room changes and restarts, then either wait for a key
    /// (finished game) or open the prompt.
    fn step(&mut self) {
        let mut transitions = 0;
        while !self.quit && (self.ctx.next_room().is_some() || self.ctx.reset) {
            if transitions == MAX_TRANSITIONS {
                tracing::warn!(room = self.ctx.room_name(), "too many room changes, stopping");
                self.ctx.take_next_room();
                self.ctx.reset = false;
                break;
            }
            transitions += 1;
            if self.ctx.next_room().is_some() {
                self.with_interp(|interp| interp.update_change_room());
            } else {
                self.restart();
            }
        }
        if self.quit {
            return;
        }

        if self.ctx.finished {
            if self.finished_at.is_none() {
                tracing::info!("game finished");
                self.finished_at = Some(Instant::now());
            }
            self.input.set_enabled(false);
            return;
        }
        self.start_read_line();
    }

    /// Restart a finished game once the configured pause has passed.
    /// Returns whether it restarted.
    pub fn press_any_key(&mut self, now: Instant) -> bool {
        let ready = self
            .finished_at
            .is_some_and(|at| now.saturating_duration_since(at) >= self.config.finish_pause);
        if ready {
            self.reset();
        }
        ready
    }

    // ── Prompt and input ──────────────────────────────────────────────────────

    fn start_read_line(&mut self) {
        if self.input.is_enabled() || self.ctx.finished || self.ctx.next_room().is_some() {
            return;
        }
        self.out.write_line("");
        self.prev_fg = self.out.foreground();
        self.out.set_foreground(self.config.prompt_color);
        self.out.write(&self.config.prompt);
        self.out.set_foreground(self.config.input_color);

        self.input_origin = self.out.cursor();
        self.drawn = 0;
        self.input.reset_input();
        self.input.set_enabled(true);
    }

    /// Handle a line the player submitted at the prompt.
    pub fn submit_line(&mut self, line: &str) {
        self.input.set_enabled(false);
        self.out.set_foreground(self.prev_fg);
        self.out.write_line("");

        if is_quit_command(line) {
            tracing::info!("quit requested");
            self.quit = true;
            return;
        }
        tracing::debug!(line, "input");
        self.with_interp(|interp| interp.execute_action(line));
        self.step();
    }

    /// Play `line` as if it had been typed at the prompt.  Ignored while no
    /// prompt is open.
    pub fn feed_line(&mut self, line: &str) {
        if !self.input.is_enabled() {
            tracing::debug!(line, "no prompt open, line dropped");
            return;
        }
        self.out.write(line);
        self.submit_line(line);
    }

    /// Repaint the input line after an edit.
    pub fn redraw_input(&mut self) {
        if !self.input.is_enabled() {
            return;
        }
        let text = self.input.current_text();
        let len = text.chars().count();
        let (column, row) = self.input_origin;

        self.out.goto_xy(column, row);
        self.out.write(&text);
        for _ in len..self.drawn {
            self.out.write_char(' ');
        }
        self.drawn = len;

        let cursor = usize::from(column) + self.input.cursor();
        self.out.goto_xy(u16::try_from(cursor).unwrap_or(u16::MAX), row);
    }

    // ── Interpreter access ────────────────────────────────────────────────────

    /// Run `f` against the loaded game, then act on queued host actions and
    /// report any script error.  Does nothing without a game.
    fn with_interp<T>(
        &mut self,
        f: impl FnOnce(&mut Interpreter<'_>) -> Result<T, ScriptError>,
    ) -> Option<T> {
        let game = self.game.as_ref()?;
        let result = f(&mut Interpreter::new(game, &mut self.ctx, &mut self.out));

        for action in self.ctx.take_actions() {
            match action {
                ScriptAction::Exit => {
                    tracing::info!("script requested exit");
                    self.quit = true;
                }
            }
        }

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(error = %e, room = self.ctx.room_name(), "script error");
                self.out.write_line(&e.to_string());
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
