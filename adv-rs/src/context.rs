//! Per-playthrough state.
//!
//! A [`Context`] is created fresh when a game (re)starts and thrown away on
//! reset.  It refers to rooms and objects by their lower-case names; the
//! [`Game`] passed alongside resolves them.

use std::collections::HashMap;

use crate::script::value::Value;
use crate::world::{Entity, Game};

/// Room the session starts in.
pub const DEFAULT_ROOM: &str = "main";

/// Shown for the current or last room when there is none.
pub const NO_ROOM: &str = "[nil]";

/// Side effects a script asks of the host rather than of the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptAction {
    /// Leave the application.
    Exit,
}

#[derive(Debug, Clone)]
pub struct Context {
    vars: HashMap<String, Value>,
    inventory: Vec<String>,
    room: Option<String>,
    next_room: Option<String>,
    last_room: String,
    /// Set by `finish`; the host waits for a key and restarts.
    pub finished: bool,
    /// Set by `reset`; the host restarts at the next update.
    pub reset: bool,
    /// Printed when no event matches a line of input.
    pub default_message: Option<String>,
    /// Dispatch policy: run every matching event, or only the first.
    pub run_all: bool,
    actions: Vec<ScriptAction>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            inventory: Vec::new(),
            room: None,
            next_room: None,
            last_room: NO_ROOM.to_owned(),
            finished: false,
            reset: false,
            default_message: None,
            run_all: true,
            actions: Vec::new(),
        }
    }

    // ── Variables ─────────────────────────────────────────────────────────────

    /// Unknown names read as the default value.
    pub fn variable(&self, name: &str) -> Value {
        self.vars.get(name).cloned().unwrap_or_default()
    }

    pub fn set_variable(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_owned(), value);
    }

    // ── Rooms ─────────────────────────────────────────────────────────────────

    /// Current room, resolved against `game`.
    pub fn room<'g>(&self, game: &'g Game) -> Option<&'g Entity> {
        self.room.as_deref().and_then(|name| game.room(name))
    }

    /// Current room name, or [`NO_ROOM`].
    pub fn room_name(&self) -> &str {
        self.room.as_deref().unwrap_or(NO_ROOM)
    }

    pub fn last_room(&self) -> &str {
        &self.last_room
    }

    /// Remember the current room (or [`NO_ROOM`]) as the last one.  Done
    /// before its exit events run, so they already see it in `lastroom`.
    pub(crate) fn mark_last_room(&mut self) {
        self.last_room = self.room_name().to_owned();
    }

    pub(crate) fn set_room(&mut self, name: &str) {
        self.room = Some(name.to_owned());
    }

    /// Queue a transition for the next update.  Naming a room that does not
    /// exist cancels any pending transition.
    pub fn set_next_room(&mut self, game: &Game, name: &str) {
        self.next_room = game.room(name).map(|r| r.name.clone());
    }

    pub fn next_room(&self) -> Option<&str> {
        self.next_room.as_deref()
    }

    pub(crate) fn take_next_room(&mut self) -> Option<String> {
        self.next_room.take()
    }

    // ── Inventory ─────────────────────────────────────────────────────────────

    /// Add an object by name.  Unknown objects are ignored; duplicates are
    /// kept.  Returns whether the object was added.
    pub fn add_to_inventory(&mut self, game: &Game, name: &str) -> bool {
        match game.object(name) {
            Some(obj) => {
                self.inventory.push(obj.name.clone());
                true
            }
            None => false,
        }
    }

    /// Remove the first entry named `name`.
    pub fn remove_from_inventory(&mut self, name: &str) -> bool {
        let name = name.to_lowercase();
        match self.inventory.iter().position(|n| *n == name) {
            Some(i) => {
                self.inventory.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn has_in_inventory(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.inventory.iter().any(|n| *n == name)
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    // ── Host actions ──────────────────────────────────────────────────────────

    pub fn push_action(&mut self, action: ScriptAction) {
        self.actions.push(action);
    }

    /// Drain queued host actions.
    pub fn take_actions(&mut self) -> Vec<ScriptAction> {
        std::mem::take(&mut self.actions)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
