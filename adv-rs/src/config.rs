//! `adv.conf` configuration file parser.
//!
//! One setting per line:
//!
//! | Form | Example |
//! |------|---------|
//! | `key = value` | `prompt = "? "` |
//! | `set key=value` or `/set key value` | `set run_all=off` |
//! | Lines starting with `#` or `;` | comment, ignored |
//!
//! Values may be double-quoted to keep surrounding spaces; `\"`, `\\` and
//! `\n` are recognised inside quotes.  Bad lines are reported and skipped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::Level;

use crate::context::DEFAULT_ROOM;
use crate::palette::Color;

/// Title line printed when a game starts.
pub const BANNER: &str = "Zrukall Text Adventure Engine 0.1";

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Player settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Script to play when none is named on the command line.
    pub script: Option<PathBuf>,
    pub start_room: String,
    /// `None` hides the title line.
    pub banner: Option<String>,
    pub prompt: String,
    pub prompt_color: Color,
    pub input_color: Color,
    /// Initial event dispatch policy.
    pub run_all: bool,
    /// Minimum time between `finish` and the key press that restarts.
    pub finish_pause: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            script: None,
            start_room: DEFAULT_ROOM.to_owned(),
            banner: Some(BANNER.to_owned()),
            prompt: "> ".to_owned(),
            prompt_color: Color::Red,
            input_color: Color::White,
            run_all: true,
            finish_pause: Duration::from_millis(500),
            log_file: None,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config text on top of the defaults.
    ///
    /// Returns the config and a list of any errors; lines with errors leave
    /// their setting unchanged.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Err(message) = config.apply_line(line) {
                errors.push(ConfigError { line: i + 1, message });
            }
        }

        (config, errors)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    fn apply_line(&mut self, line: &str) -> Result<(), String> {
        let body = line.strip_prefix('/').unwrap_or(line);
        let body = match body.strip_prefix("set") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => body,
        };
        let (key, value) = match body.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => body
                .split_once(char::is_whitespace)
                .map(|(k, v)| (k, v.trim()))
                .ok_or_else(|| format!("missing value for '{body}'"))?,
        };
        self.set(key, &unquote(value)?)
    }

    /// Set one key from its text form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "script" => self.script = non_empty(value).map(PathBuf::from),
            "start_room" => {
                if value.is_empty() {
                    return Err("start_room cannot be empty".into());
                }
                self.start_room = value.to_lowercase();
            }
            "banner" => self.banner = non_empty(value).map(str::to_owned),
            "prompt" => self.prompt = value.to_owned(),
            "prompt_color" => self.prompt_color = parse_color(value)?,
            "input_color" => self.input_color = parse_color(value)?,
            "run_all" => self.run_all = parse_bool(value)?,
            "finish_pause_ms" => {
                let ms: u64 = value.parse().map_err(|_| format!("invalid duration: {value}"))?;
                self.finish_pause = Duration::from_millis(ms);
            }
            "log_file" => self.log_file = non_empty(value).map(PathBuf::from),
            "log_level" => {
                self.log_level = value.parse().map_err(|_| format!("invalid log level: {value}"))?;
            }
            other => return Err(format!("unknown setting '{other}'")),
        }
        Ok(())
    }
}

// ── Value helpers ─────────────────────────────────────────────────────────────

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "on" | "yes" | "true" => Ok(true),
        "0" | "off" | "no" | "false" => Ok(false),
        _ => Err(format!("invalid boolean: {s}")),
    }
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<i32>()
        .ok()
        .and_then(Color::from_index)
        .ok_or_else(|| format!("invalid color index: {s} (expected 0-15)"))
}

/// Strip surrounding double quotes and resolve escapes inside them.
fn unquote(s: &str) -> Result<String, String> {
    let Some(inner) = s.strip_prefix('"') else {
        return Ok(s.to_owned());
    };
    let inner = inner.strip_suffix('"').ok_or_else(|| format!("unterminated quote: {s}"))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some(c) => out.push(c),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
