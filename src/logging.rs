// Logging setup for RetroPong
// The TUI owns the terminal, so the game logs to a file (enabled via --debug).
// controller-server logs to stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PATH: &str = "/tmp/retropong.log";

/// RUST_LOG if set, otherwise `default`
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize file logging for the game.
///
/// With `enabled == false` nothing is installed and every `tracing` call is a
/// no-op. Otherwise the file is truncated, a header is written, and all events
/// at `debug` and above (or per RUST_LOG) are appended without ANSI colors.
pub fn init_file(enabled: bool, path: &Path) -> io::Result<()> {
    if !enabled {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    writeln!(file, "=== RetroPong Debug Log ===")?;
    writeln!(file, "Session started: {:?}", SystemTime::now())?;
    writeln!(file, "To monitor: tail -f {}", path.display())?;
    writeln!(file, "========================================\n")?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("debug"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    tracing::info!("RetroPong debug logging initialized");
    Ok(())
}

/// Initialize stdout logging for controller-server
pub fn init_stdout() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info,tower_http=debug"))
        .init();
}
