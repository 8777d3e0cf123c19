//! Drive the `adv` binary in plain mode: scripts are written to temporary
//! files, player input is piped to stdin and the transcript read back from
//! stdout.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Path to the `adv` binary built by this Cargo workspace.
fn binary() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_adv"))
}

fn script_file(src: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp script");
    f.write_all(src.as_bytes()).expect("write temp script");
    f
}

/// Run the binary with `args` (after `-v -f`), feed `input`, and return
/// (exit success, stdout, stderr).
fn run(args: &[&str], input: &str) -> (bool, String, String) {
    let mut child = Command::new(binary())
        .args(["-v", "-f"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn adv");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait for adv");
    (
        out.status.success(),
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}

const GAME: &str = r#"
room main :
  on enter : writeln "You are in a small room." end
  on "look" : writeln "Bare walls." end
  on "north" : goto hall end
end
room hall :
  on enter : writeln "A long hall." end
  on "leave" : writeln "Goodbye.", exit end
end
"#;

// ── Cases ─────────────────────────────────────────────────────────────────────

#[test]
fn plays_piped_input() {
    let script = script_file(GAME);
    let path = script.path().to_str().unwrap();
    let (ok, out, err) = run(&[path], "look\nnorth\nleave\n");
    assert!(ok, "stderr: {err}");
    assert!(out.starts_with(adv::config::BANNER), "{out}");
    assert!(!out.contains('\x1b'), "escape sequences in plain mode: {out:?}");
    let order = ["You are in a small room.", "Bare walls.", "A long hall.", "Goodbye."];
    let positions: Vec<usize> = order
        .iter()
        .map(|s| out.find(s).unwrap_or_else(|| panic!("missing {s:?} in {out}")))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{out}");
}

#[test]
fn quiet_flag_hides_banner() {
    let script = script_file(GAME);
    let (ok, out, _) = run(&["-q", script.path().to_str().unwrap()], ":q\n");
    assert!(ok);
    assert!(!out.contains(adv::config::BANNER), "{out}");
    assert!(out.contains("You are in a small room."));
}

#[test]
fn start_room_and_commands() {
    let script = script_file(GAME);
    let (ok, out, _) = run(&["-q", "-rhall", "-cleave", script.path().to_str().unwrap()], "");
    assert!(ok);
    assert!(out.contains("A long hall."), "{out}");
    assert!(out.contains("> leave"), "{out}");
    assert!(out.contains("Goodbye."), "{out}");
    assert!(!out.contains("small room"), "{out}");
}

#[test]
fn scripts_are_merged() {
    let rooms = script_file(GAME);
    let extra = script_file(
        r#"object key : on "look key" : writeln "A brass key." end end
           room main : on enter : writeln "ignored duplicate" end end"#,
    );
    let (ok, out, _) = run(
        &["-q", rooms.path().to_str().unwrap(), extra.path().to_str().unwrap()],
        "look\n:quit\n",
    );
    assert!(ok);
    assert!(out.contains("Bare walls."), "{out}");
    assert!(!out.contains("ignored duplicate"), "{out}");
}

#[test]
fn parse_error_shows_no_game() {
    let script = script_file("room main : on enter : writeln ( end end");
    let (ok, out, _) = run(&[script.path().to_str().unwrap()], "look\n:q\n");
    assert!(ok);
    assert!(out.contains("syntax error"), "{out}");
    assert!(out.contains(adv::session::NO_GAME), "{out}");
}

#[test]
fn missing_script_file() {
    let (ok, out, _) = run(&["/nonexistent/game.adv"], "");
    assert!(ok);
    assert!(out.contains("/nonexistent/game.adv"), "{out}");
    assert!(out.contains(adv::session::NO_GAME), "{out}");
}

#[test]
fn embedded_demo_without_scripts() {
    let (ok, out, _) = run(&["-q"], "look\n");
    assert!(ok);
    assert!(out.contains("mouth of a cave"), "{out}");
    assert!(out.contains("brass lamp"), "{out}");
}

#[test]
fn config_file_is_read() {
    let conf = script_file("prompt = \"? \"\nbanner =\n");
    let script = script_file(GAME);
    let arg = format!("-f{}", conf.path().display());
    let out = Command::new(binary())
        .args(["-v", &arg, script.path().to_str().unwrap()])
        .stdin(Stdio::null())
        .output()
        .expect("run adv");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("? "), "{stdout}");
    assert!(!stdout.contains(adv::config::BANNER), "{stdout}");
}

#[test]
fn unknown_option_fails() {
    let out = Command::new(binary()).arg("-z").output().expect("run adv");
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("unknown option: -z"), "{err}");
    assert!(err.contains("Usage:"), "{err}");
}
