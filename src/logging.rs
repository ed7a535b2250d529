//! Tracing subscriber setup for the binaries.
//!
//! Filtering follows `RUST_LOG`. The TUI owns the terminal, so it only logs
//! when given a file; the headless runner logs to stderr and keeps stdout for
//! its JSON report.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, `warn` and above unless `RUST_LOG` says otherwise.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a freshly truncated file, `info` and above by default.
pub fn init_file(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter("info"))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("cannot install log subscriber: {err}"))
}
