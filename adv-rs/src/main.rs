use std::path::PathBuf;

use adv::cli::{self, ConfigFile};
use adv::config::Config;
use adv::embedded;
use adv::event_loop::EventLoop;
use adv::input::LineInput;
use adv::logging;
use adv::session::{load_game, Session};
use adv::terminal::Terminal;

const USAGE: &str = "Usage: adv [-f[<file>]] [-r<room>] [-c<line>] [-l<file>] [-vdq] [<script>...]";

#[tokio::main]
async fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("adv: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    // ── Load config ───────────────────────────────────────────────────────────
    let config_path = match &args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path.clone()),
        ConfigFile::Search => cli::find_user_config(),
    };
    let mut config = Config::new();
    if let Some(path) = &config_path {
        match Config::load_file(path) {
            Ok((loaded, errors)) => {
                for e in &errors {
                    eprintln!("adv: {}: {e}", path.display());
                }
                config = loaded;
            }
            Err(e) => eprintln!("adv: warning: {}: {e}", path.display()),
        }
    }
    args.apply_to(&mut config);

    // ── Logging ───────────────────────────────────────────────────────────────
    let _log_guard = match &config.log_file {
        Some(path) => match logging::enable(path, config.log_level) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("adv: can't log to {}: {e}", path.display());
                None
            }
        },
        None => None,
    };
    tracing::info!(config = ?config_path, "starting");

    // ── Output and input devices ──────────────────────────────────────────────
    let is_tty = unsafe {
        libc::isatty(libc::STDIN_FILENO) != 0 && libc::isatty(libc::STDOUT_FILENO) != 0
    };
    let terminal = if is_tty && !args.no_visual {
        Terminal::new(std::io::stdout())
    } else {
        Terminal::plain(std::io::stdout())
    };
    let mut session = Session::new(config, terminal, LineInput::new());

    // ── Load the adventure ────────────────────────────────────────────────────
    let scripts: Vec<PathBuf> = if args.scripts.is_empty() {
        session.config().script.iter().cloned().collect()
    } else {
        args.scripts.clone()
    };
    let loaded = if scripts.is_empty() {
        tracing::info!(script = embedded::demo().name, "playing embedded adventure");
        load_game([embedded::demo().source]).map_err(|e| e.to_string())
    } else {
        read_scripts(&scripts).and_then(|sources| {
            load_game(sources.iter().map(String::as_str)).map_err(|e| e.to_string())
        })
    };
    match loaded {
        Ok(game) => session.set_game(game),
        Err(message) => session.fail_load(&message),
    }

    // ── Enter main loop ───────────────────────────────────────────────────────
    let mut event_loop = EventLoop::new(session);
    if let Err(e) = event_loop.run(&args.commands).await {
        tracing::error!(error = %e, "terminal failure");
        eprintln!("adv: {e}");
        std::process::exit(1);
    }
}

/// Read every script, naming the first one that can't be read.
fn read_scripts(paths: &[PathBuf]) -> Result<Vec<String>, String> {
    paths
        .iter()
        .map(|p| std::fs::read_to_string(p).map_err(|e| format!("{}: {e}", p.display())))
        .collect()
}
