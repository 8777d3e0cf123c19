//! Tree-walking interpreter: event dispatch over a [`Game`] and a
//! [`Context`].
//!
//! An [`Interpreter`] is a short-lived view that borrows the (immutable)
//! game, the play context and the output device for one batch of work:
//! a room change, a line of input, or a single expression.

use crate::context::Context;
use crate::device::OutputDevice;
use crate::world::{Event, Game};

use super::builtins::{call_builtin, Builtin};
use super::error::ScriptError;
use super::expr::{eval_expr, EvalContext, Expr};
use super::stmt::{exec_block, Stmt};
use super::value::Value;

pub struct Interpreter<'a> {
    pub(crate) game: &'a Game,
    pub(crate) ctx: &'a mut Context,
    pub(crate) out: &'a mut dyn OutputDevice,
}

impl<'a> Interpreter<'a> {
    pub fn new(game: &'a Game, ctx: &'a mut Context, out: &'a mut dyn OutputDevice) -> Self {
        Self { game, ctx, out }
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value, ScriptError> {
        eval_expr(expr, self)
    }

    pub fn exec(&mut self, block: &[Stmt]) -> Result<Value, ScriptError> {
        exec_block(block, self)
    }

    /// Move to room `name`: run the current room's exit events, switch, then
    /// run the new room's enter events.  Unknown names are ignored.
    pub fn change_room(&mut self, name: &str) -> Result<(), ScriptError> {
        let game = self.game;
        let Some(target) = game.room(name) else {
            tracing::debug!(room = name, "no such room");
            return Ok(());
        };
        tracing::debug!(from = self.ctx.room_name(), to = %target.name, "change room");

        self.ctx.mark_last_room();
        if let Some(current) = self.ctx.room(game) {
            self.run_events(current.exit_events())?;
        }
        self.ctx.set_room(&target.name);
        self.run_events(target.enter_events())?;
        Ok(())
    }

    /// Perform the room change queued by `goto`, if any.  Returns whether
    /// one happened.
    pub fn update_change_room(&mut self) -> Result<bool, ScriptError> {
        match self.ctx.take_next_room() {
            Some(next) => {
                self.change_room(&next)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Dispatch a line of player input.
    ///
    /// Carried objects are offered the line first, in inventory order, then
    /// the current room.  The first entity with a matching action event
    /// handles it.  Returns whether anything matched; if nothing did, the
    /// default message (when set) is printed.
    pub fn execute_action(&mut self, input: &str) -> Result<bool, ScriptError> {
        let game = self.game;
        let Some(room) = self.ctx.room(game) else {
            return Ok(false);
        };

        // The handlers may change the inventory while we walk it.
        let carried = self.ctx.inventory().to_vec();
        let mut handled = false;
        for name in &carried {
            if let Some(object) = game.object(name) {
                if self.run_events(object.action_events(input))? {
                    handled = true;
                    break;
                }
            }
        }
        if !handled {
            handled = self.run_events(room.action_events(input))?;
        }
        tracing::debug!(input, handled, "action");

        if !handled {
            if let Some(msg) = self.ctx.default_message.clone() {
                self.out.write_line(&msg);
            }
        }
        Ok(handled)
    }

    /// Run matching events under the dispatch policy.  Returns whether at
    /// least one ran.  The policy is fixed for the whole dispatch; a handler
    /// that switches it only affects later dispatches.
    fn run_events<'e>(&mut self, events: impl Iterator<Item = &'e Event>) -> Result<bool, ScriptError> {
        let run_all = self.ctx.run_all;
        let mut ran = false;
        for event in events {
            tracing::trace!(trigger = ?event.trigger, "fire event");
            exec_block(&event.body, self)?;
            ran = true;
            if !run_all {
                break;
            }
        }
        Ok(ran)
    }
}

impl EvalContext for Interpreter<'_> {
    fn get_var(&self, name: &str) -> Value {
        self.ctx.variable(name)
    }

    fn set_var(&mut self, name: &str, value: Value) {
        self.ctx.set_variable(name, value);
    }

    fn call_fn(&mut self, func: Builtin, args: &[Expr]) -> Result<Value, ScriptError> {
        call_builtin(self, func, args)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
