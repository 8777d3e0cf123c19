//! Command-line argument parsing.
//!
//! Usage:
//!   adv [-f[<file>]] [-r<room>] [-c<line>] [-l<file>] [-vdq] [<script>...]

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::config::Config;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Which config file to load.
    pub config: ConfigFile,
    /// Start room override (`-r<room>`).
    pub room: Option<String>,
    /// Lines of input to play after start (`-c<line>`, repeatable).
    pub commands: Vec<String>,
    /// Log file (`-l<file>`).
    pub log_file: Option<PathBuf>,
    /// Hide the banner (`-q`).
    pub quiet: bool,
    /// Disable visual mode (`-v`).
    pub no_visual: bool,
    /// Debug logging (`-d`).
    pub debug: bool,
    /// Scripts to load, merged in order.
    pub scripts: Vec<PathBuf>,
}

/// How to choose the config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// Search the platform config directory, then `./adv.conf` (default).
    #[default]
    Search,
    /// `-f` with no file argument: skip the config file.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

impl CliArgs {
    /// Fold the flags that override config settings into `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(room) = &self.room {
            config.start_room = room.to_lowercase();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if self.debug {
            config.log_level = tracing::Level::DEBUG;
        }
        if self.quiet {
            config.banner = None;
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            args.scripts.extend(argv[i + 1..].iter().map(PathBuf::from));
            break;
        }

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            args.scripts.push(PathBuf::from(arg));
            i += 1;
            continue;
        }

        // Flag argument: iterate over characters after the leading `-`.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            let flag = chars[j];
            match flag {
                'd' => args.debug = true,
                'q' => args.quiet = true,
                'v' => args.no_visual = true,

                // -f[<file>]: the file must be attached, since a separate
                // argument would be read as a script.
                'f' => {
                    args.config = if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        ConfigFile::Explicit(PathBuf::from(file))
                    } else {
                        ConfigFile::Skip
                    };
                }

                'r' => args.room = Some(flag_value(&chars, &mut j, argv, &mut i, "a room name")?),
                'c' => {
                    let line = flag_value(&chars, &mut j, argv, &mut i, "a line of input")?;
                    args.commands.push(line);
                }
                'l' => {
                    let file = flag_value(&chars, &mut j, argv, &mut i, "a file name")?;
                    args.log_file = Some(PathBuf::from(file));
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    Ok(args)
}

/// Value of the flag at `chars[*j]`: the rest of the same argument, or
/// else the whole next argument.  Moves `j` / `i` past what it used.
fn flag_value(
    chars: &[char],
    j: &mut usize,
    argv: &[String],
    i: &mut usize,
    what: &str,
) -> Result<String, String> {
    let flag = chars[*j];
    if *j + 1 < chars.len() {
        let value = chars[*j + 1..].iter().collect();
        *j = chars.len();
        Ok(value)
    } else if *i + 1 < argv.len() {
        *i += 1;
        Ok(argv[*i].clone())
    } else {
        Err(format!("-{flag} requires {what}"))
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Search for the config file in the standard locations.
/// Returns the first path that exists, or `None`.
pub fn find_user_config() -> Option<PathBuf> {
    ProjectDirs::from("", "", "adv")
        .map(|dirs| dirs.config_dir().join("adv.conf"))
        .into_iter()
        .chain(std::iter::once(PathBuf::from("./adv.conf")))
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
