//! Whole adventures played through a [`Session`] against an in-memory
//! screen.

use std::time::{Duration, Instant};

use adv::config::Config;
use adv::device::MemoryOutput;
use adv::input::LineInput;
use adv::palette::Color;
use adv::session::{load_game, Session, NO_GAME};

type TestSession = Session<MemoryOutput, LineInput>;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn play(src: &str, lines: &[&str]) -> TestSession {
    let mut cfg = Config::new();
    cfg.banner = None;
    cfg.finish_pause = Duration::ZERO;
    let mut s = Session::new(cfg, MemoryOutput::new(), LineInput::new());
    match load_game([src]) {
        Ok(game) => s.set_game(game),
        Err(e) => s.fail_load(&e.to_string()),
    }
    s.reset();
    for line in lines {
        s.feed_line(line);
    }
    s
}

/// Output lines with prompts and blank lines removed.
fn said(s: &TestSession) -> Vec<String> {
    s.out
        .all_lines()
        .into_iter()
        .filter(|l| !l.is_empty() && !l.starts_with("> "))
        .collect()
}

// ── Cases ─────────────────────────────────────────────────────────────────────

#[test]
fn loops_and_variables() {
    let s = play(
        r#"
        room main :
          on "count" :
            let total = 0,
            for i in 1 to 4 : let total = total + i end,
            writeln "up " total,
            for i in 3 downto 1 : write i end,
            writeln "",
            let n = 10,
            while n > 7 : let n = n - 1 end,
            writeln "n=" n
          end
        end
        "#,
        &["count"],
    );
    assert_eq!(said(&s), ["up 10", "321", "n=7"]);
}

#[test]
fn range_operator_in_for() {
    let s = play(
        r#"room main : on "go" : for i in 1 .. 3 : write (i + " ") end, writeln "" end end"#,
        &["go"],
    );
    assert_eq!(said(&s), ["1 2 3 "]);
}

#[test]
fn else_if_chains() {
    let src = r#"
        room main :
          on "check" :
            if x > 2 : writeln "big" else if x > 1 : writeln "mid" else : writeln "small" end,
            let x = x + 1
          end
        end
    "#;
    let s = play(src, &["check", "check", "check", "check"]);
    assert_eq!(said(&s), ["small", "small", "mid", "big"]);
}

#[test]
fn variables_survive_room_changes_but_not_resets() {
    let src = r#"
        room main :
          on enter : writeln "visits " visits, let visits = visits + 1 end
          on "loop" : goto main end
          on "again" : reset end
        end
    "#;
    let s = play(src, &["loop", "loop", "again"]);
    assert_eq!(said(&s), ["visits 0", "visits 1", "visits 2", "visits 0"]);
}

#[test]
fn exit_and_enter_see_room_names() {
    let src = r#"
        room main :
          on exit : writeln "bye " (roomname) end
          on "east" : goto east end
        end
        room east :
          on enter : writeln (lastroom) " -> " (roomname) end
          on "west" : goto main end
        end
    "#;
    let s = play(src, &["east", "west"]);
    assert_eq!(said(&s), ["bye main", "main -> east"]);
}

#[test]
fn carried_objects_answer_first() {
    let src = r#"
        room main :
          on "take coin" : invadd coin, writeln "taken" end
          on "flip coin" : writeln "no coin here" end
        end
        object coin :
          on "flip coin" : writeln "heads" end
          on "drop coin" : invrem coin, writeln "dropped" end
        end
    "#;
    let s = play(src, &["flip coin", "take coin", "flip coin", "drop coin", "flip coin"]);
    assert_eq!(said(&s), ["no coin here", "taken", "heads", "dropped", "no coin here"]);
}

#[test]
fn word_alternatives_in_patterns() {
    let src = r#"
        room main :
          on "get|take lamp|torch" : writeln "ok" end
          on "look|l" : writeln "seen" end
        end
    "#;
    let s = play(src, &["take the torch", "get lamp", "l", "lamp"]);
    assert_eq!(said(&s), ["ok", "ok", "seen"]);
}

#[test]
fn run_first_stops_after_one_event() {
    let src = r#"
        room main :
          on "hit" : writeln "one" end
          on "hit" : writeln "two" end
          on "calm" : setrunfst end
          on "wild" : setrunall end
        end
    "#;
    let s = play(src, &["hit", "calm", "hit", "wild", "hit"]);
    assert_eq!(said(&s), ["one", "two", "one", "one", "two"]);
}

#[test]
fn policy_set_inside_handler_applies_from_next_line() {
    let src = r#"
        room main :
          on "hit" : setrunfst, writeln "one" end
          on "hit" : writeln "two" end
        end
    "#;
    let s = play(src, &["hit", "hit"]);
    assert_eq!(said(&s), ["one", "two", "one"]);
}

#[test]
fn colored_writes() {
    let s = play(r#"room main : on enter : writeln 14 1 "warn" " plain" end end"#, &[]);
    let warn = s.out.spans.iter().find(|sp| sp.text == "warn").unwrap();
    assert_eq!((warn.fg, warn.bg), (Color::BrightYellow, Color::Blue));
    assert!(s.out.lines.contains(&"warn plain".to_owned()));
}

#[test]
fn finish_then_key_restarts() {
    let mut s = play(
        r#"room main : on enter : writeln "start" end on "win" : writeln "won", finish end end"#,
        &["win"],
    );
    assert!(s.is_finished());
    assert!(s.press_any_key(Instant::now()));
    assert_eq!(said(&s), ["start"]);
}

#[test]
fn division_by_zero_is_reported() {
    let s = play(
        r#"room main : on "x" : writeln (5 mod 0) end on "y" : writeln (5.0 / 0) end end"#,
        &["x", "y"],
    );
    let lines = said(&s);
    assert!(lines[0].contains("division by zero"), "{lines:?}");
    assert_eq!(lines[1], "inf");
}

#[test]
fn broken_script_reports_and_waits_for_quit() {
    let mut s = play("room main : on enter : writeln \"\\q\" end end", &["look"]);
    let lines = said(&s);
    assert!(lines[0].starts_with("lexical error"), "{lines:?}");
    assert!(lines.contains(&NO_GAME.to_owned()));
    assert!(!s.is_quit());
    s.feed_line(":quit");
    assert!(s.is_quit());
}

#[test]
fn exit_builtin_ends_session() {
    let s = play(r#"room main : on "bye" : writeln "farewell", exit end end"#, &["bye", "bye"]);
    assert!(s.is_quit());
    assert_eq!(said(&s), ["farewell"]);
}
