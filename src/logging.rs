//! Logging configuration for rangeview.
//!
//! The terminal page logs to a file so log lines never land on the drawn
//! screen; headless runs log to stderr next to the status line.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Per-statement sqlx logs and
/// per-request HTTP logs stay at warn.
const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn,hyper_util=warn,reqwest=warn";

/// Where log output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Truncated on each run.
    File(PathBuf),
    Stderr,
}

impl LogTarget {
    /// Picks the target for the front-end in use.
    pub fn for_mode(headless: bool) -> Self {
        if headless {
            Self::Stderr
        } else {
            Self::File(get_log_path())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn install<W>(writer: W, ansi: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
}

/// Initializes logging for `target`.
///
/// A log file that cannot be created falls back to stderr with a warning.
pub fn init(target: &LogTarget) {
    match target {
        LogTarget::Stderr => install(std::io::stderr, true),
        LogTarget::File(path) => match open_log_file(path) {
            Ok(file) => install(Mutex::new(file), false),
            Err(e) => {
                eprintln!("Warning: {e}; logging to stderr");
                install(std::io::stderr, true);
            }
        },
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("could not create log directory {}: {e}", parent.display()),
            )
        })?;
    }
    File::create(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("could not create log file {}: {e}", path.display()),
        )
    })
}

/// Returns the path for the log file.
///
/// Location: `~/.local/state/rangeview/rangeview.log` on Linux (XDG state
/// directory), or the platform config directory elsewhere.
pub fn get_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("rangeview").join("rangeview.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("rangeview.log"))
}
