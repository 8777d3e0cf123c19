//! Diagnostic logging to a file.
//!
//! The terminal belongs to the game, so log records only ever go to the
//! file named by `-l` / `log_file`.  Without one no subscriber is installed
//! and the `tracing` macros cost next to nothing.

use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter, fmt, prelude::*, Registry};

/// Install a global subscriber appending to `path` at `level` and above.
///
/// Keep the returned guard alive for the whole run; dropping it flushes
/// and stops the background writer.
pub fn enable(path: &Path, level: tracing::Level) -> io::Result<WorkerGuard> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?;
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter::Targets::default().with_default(level));

    tracing::subscriber::set_global_default(Registry::default().with(file_layer))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(guard)
}
