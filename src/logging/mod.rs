//! Error log.
//!
//! Failures that reach the top of a command or the menu loop, and every
//! corrupt-vault reset, are emitted as `tracing` events. `init` installs a
//! `fmt` subscriber that appends them to the configured log file, one line
//! per event:
//!
//! ```text
//! 2026-10-15T09:12:44.120456Z ERROR Entry index 4 is out of range (3 entries)
//! ```
//!
//! The default filter is `warn`; set `CREDVAULT_LOG` (an `EnvFilter`
//! directive such as `debug`) to see more. Writing the log is best-effort:
//! an unwritable log file swallows the event instead of failing the command.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::Subscriber;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::errors::{CredVaultError, Result};

/// Environment variable holding the log filter directive.
pub const FILTER_ENV: &str = "CREDVAULT_LOG";

/// Log file opened in append mode for every event.
///
/// The file (and its directory) is only created once something is logged,
/// so a clean run leaves no trace on disk.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> io::Result<File> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = Box<dyn io::Write + 'a>;

    fn make_writer(&'a self) -> Self::Writer {
        match self.open() {
            Ok(file) => Box::new(file),
            Err(_) => Box::new(io::sink()),
        }
    }
}

/// Build the subscriber that writes plain-text events to `log`.
pub fn subscriber(log: LogFile) -> impl Subscriber + Send + Sync {
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(log)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
}

/// Install the file subscriber as the process-wide default.
pub fn init(log: LogFile) -> Result<()> {
    tracing::subscriber::set_global_default(subscriber(log))
        .map_err(|e| CredVaultError::CommandFailed(format!("logger setup: {e}")))
}
