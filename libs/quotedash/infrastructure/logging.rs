//! Logging initialization
//!
//! The dashboard owns the terminal, so logs are written to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Initialize tracing into `log_file`.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_tracing(log_file: impl AsRef<Path>, default_level: &str) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(false)
        .init();

    Ok(())
}
