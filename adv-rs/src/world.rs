//! Game world: rooms, objects, and the events bound to them.
//!
//! The world is built once by the parser and read-only afterwards; all
//! mutable play state lives in [`Context`](crate::context::Context).

use std::collections::HashMap;

use crate::script::stmt::Stmt;

// ── ActionPattern ─────────────────────────────────────────────────────────────

/// The text pattern of an `on "..."` event, e.g. `"take|get lamp"`.
///
/// A pattern is a `|`-separated list of phrases.  Matching against a line of
/// input (case-insensitive) succeeds when:
///
/// 1. the whole input equals the whole pattern, or
/// 2. the input is one word and equals one of the phrases, or
/// 3. the input has several words and
///    - some multi-word phrase's words all appear in the input, in order
///      (other words may sit between them), or
///    - reading the pattern as word slots, where `|` offers alternatives for
///      a single word (`go|walk north|n` is `[go/walk] [north/n]`), every
///      slot is filled by a distinct input word, in order.
///
/// A lone verb such as `go` therefore matches `go` but does not make every
/// `go ...` command match.  Single-word phrases only take part in rule 3
/// through the slot reading, so `look` matches `look around` while
/// `look|examine room` (slots `[look/examine] [room]`) does not, and
/// `n|go north` does not match `n please`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPattern {
    text: String,
}

impl ActionPattern {
    pub fn new(text: &str) -> Self {
        Self { text: text.to_lowercase() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim().to_lowercase();
        if input == self.text {
            return true;
        }

        let words: Vec<&str> = input.split_whitespace().collect();
        let phrases = self.text.split('|').map(str::trim);
        if words.len() <= 1 {
            return phrases.into_iter().any(|p| p == input);
        }

        let phrase_match = phrases
            .map(|p| p.split_whitespace().collect::<Vec<_>>())
            .filter(|p| p.len() > 1)
            .any(|p| is_subsequence(&p, &words, |want, got| want == got));
        if phrase_match {
            return true;
        }

        let slots: Vec<Vec<&str>> = self
            .text
            .split_whitespace()
            .map(|slot| slot.split('|').filter(|w| !w.is_empty()).collect())
            .collect();
        !slots.is_empty() && is_subsequence(&slots, &words, |slot, got| slot.contains(got))
    }
}

/// True if every item of `wanted` is matched by a word of `words`, in order.
fn is_subsequence<T>(wanted: &[T], words: &[&str], hit: impl Fn(&T, &&str) -> bool) -> bool {
    let mut next = 0;
    for w in words {
        if next < wanted.len() && hit(&wanted[next], w) {
            next += 1;
        }
    }
    next == wanted.len()
}

// ── Event ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Enter,
    Exit,
    Action(ActionPattern),
}

/// A trigger and the statements it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub trigger: Trigger,
    pub body: Vec<Stmt>,
}

impl Event {
    pub fn new(trigger: Trigger, body: Vec<Stmt>) -> Self {
        Self { trigger, body }
    }

    pub fn matches_action(&self, input: &str) -> bool {
        matches!(&self.trigger, Trigger::Action(p) if p.matches(input))
    }
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Room,
    Object,
}

/// A room or an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    /// Lower-case name; the lookup key.
    pub name: String,
    pub events: Vec<Event>,
}

impl Entity {
    pub fn new(kind: EntityKind, name: &str) -> Self {
        Self { kind, name: name.to_lowercase(), events: Vec::new() }
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn enter_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.trigger == Trigger::Enter)
    }

    pub fn exit_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.trigger == Trigger::Exit)
    }

    pub fn action_events<'a>(&'a self, input: &'a str) -> impl Iterator<Item = &'a Event> {
        self.events.iter().filter(move |e| e.matches_action(input))
    }
}

// ── Game ──────────────────────────────────────────────────────────────────────

/// Every room and object of a loaded adventure, keyed by lower-case name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    rooms: HashMap<String, Entity>,
    objects: HashMap<String, Entity>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity.  The first declaration of a name wins; returns
    /// `false` if `entity` was dropped as a duplicate.
    pub fn add(&mut self, entity: Entity) -> bool {
        let map = match entity.kind {
            EntityKind::Room => &mut self.rooms,
            EntityKind::Object => &mut self.objects,
        };
        if map.contains_key(&entity.name) {
            tracing::warn!(name = %entity.name, kind = ?entity.kind, "duplicate declaration ignored");
            return false;
        }
        map.insert(entity.name.clone(), entity);
        true
    }

    /// Merge in every room and object of `other` not already declared here.
    pub fn add_from(&mut self, other: Game) {
        for entity in other.rooms.into_values().chain(other.objects.into_values()) {
            self.add(entity);
        }
    }

    pub fn room(&self, name: &str) -> Option<&Entity> {
        self.rooms.get(&name.to_lowercase())
    }

    pub fn object(&self, name: &str) -> Option<&Entity> {
        self.objects.get(&name.to_lowercase())
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Entity> {
        self.rooms.values()
    }

    pub fn objects(&self) -> impl Iterator<Item = &Entity> {
        self.objects.values()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.objects.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pat(s: &str) -> ActionPattern {
        ActionPattern::new(s)
    }

    #[test]
    fn pattern_is_lower_cased() {
        assert_eq!(pat("Take LAMP").as_str(), "take lamp");
        assert!(pat("Take LAMP").matches("take lamp"));
        assert!(pat("take lamp").matches("  TAKE Lamp "));
    }

    #[test]
    fn slot_alternatives() {
        let p = pat("go|walk north|n");
        assert!(p.matches("go north"));
        assert!(p.matches("walk n"));
        assert!(p.matches("n"));
        assert!(p.matches("go"));
        assert!(!p.matches("go south"));
        assert!(!p.matches("north"));
    }

    #[test]
    fn phrase_alternatives() {
        let p = pat("take lamp|get lamp|grab");
        assert!(p.matches("take the lamp"));
        assert!(p.matches("get lamp"));
        assert!(p.matches("grab"));
        assert!(!p.matches("take the key"));
    }

    #[test]
    fn single_word_pattern_matches_within_sentence() {
        let p = pat("look");
        assert!(p.matches("look"));
        assert!(p.matches("look around"));
        assert!(p.matches("please look"));
        assert!(!p.matches("leave"));
    }

    #[test]
    fn single_word_phrases_need_every_slot_in_sentences() {
        assert!(pat("look|examine room").matches("look"));
        assert!(pat("look|examine room").matches("look at the room"));
        assert!(!pat("look|examine room").matches("look around"));
        assert!(pat("n|go north").matches("n"));
        assert!(pat("n|go north").matches("go far north"));
        assert!(!pat("n|go north").matches("n please"));
    }

    #[test]
    fn words_must_be_in_order() {
        let p = pat("open door");
        assert!(p.matches("open the red door"));
        assert!(!p.matches("door open"));
    }

    #[test]
    fn empty_input_matches_nothing_but_empty() {
        assert!(!pat("look").matches(""));
        assert!(pat("").matches(""));
    }

    #[test]
    fn first_declaration_wins() {
        let mut g = Game::new();
        let first = Entity::new(EntityKind::Room, "Hall")
            .with_event(Event::new(Trigger::Enter, vec![]));
        assert!(g.add(first));
        assert!(!g.add(Entity::new(EntityKind::Room, "hall")));
        assert_eq!(g.room("HALL").map(|r| r.events.len()), Some(1));
    }

    #[test]
    fn rooms_and_objects_are_separate() {
        let mut g = Game::new();
        assert!(g.add(Entity::new(EntityKind::Room, "lamp")));
        assert!(g.add(Entity::new(EntityKind::Object, "lamp")));
        assert!(g.room("lamp").is_some());
        assert!(g.object("lamp").is_some());
        assert!(g.object("hall").is_none());
    }

    #[test]
    fn add_from_is_additive() {
        let mut a = Game::new();
        a.add(Entity::new(EntityKind::Room, "main"));
        let mut b = Game::new();
        b.add(Entity::new(EntityKind::Room, "main").with_event(Event::new(Trigger::Exit, vec![])));
        b.add(Entity::new(EntityKind::Object, "key"));
        a.add_from(b);
        assert!(a.room("main").is_some_and(|r| r.events.is_empty()));
        assert!(a.object("key").is_some());
        assert_eq!(a.rooms().count(), 1);
    }

    #[test]
    fn events_by_trigger() {
        let room = Entity::new(EntityKind::Room, "r")
            .with_event(Event::new(Trigger::Enter, vec![]))
            .with_event(Event::new(Trigger::Action(pat("look")), vec![]))
            .with_event(Event::new(Trigger::Exit, vec![]))
            .with_event(Event::new(Trigger::Enter, vec![]));
        assert_eq!(room.enter_events().count(), 2);
        assert_eq!(room.exit_events().count(), 1);
        assert_eq!(room.action_events("look").count(), 1);
        assert_eq!(room.action_events("jump").count(), 0);
    }
}
