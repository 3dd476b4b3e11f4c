//! Logging setup for relaychat.
//!
//! The terminal belongs to the chat, so events go to an append-only log file.
//! Stderr is only used when the file cannot be opened.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{ChatError, Result};

/// Environment variable with extra filter directives, e.g. `relaychat::connection=trace`.
pub const ENV_LOG_FILTER: &str = "RELAYCHAT_LOG";

/// Map a configured level name to a filter. Unknown names mean `info`.
fn level_filter(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => LevelFilter::WARN,
        "none" => LevelFilter::OFF,
        other => other.parse().unwrap_or(LevelFilter::INFO),
    }
}

/// Configured level as the default, refined by [`ENV_LOG_FILTER`] directives.
fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .with_env_var(ENV_LOG_FILTER)
        .from_env_lossy()
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn install<W>(writer: W, ansi: bool, level: LevelFilter) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .with(env_filter(level))
        .try_init()
        .map_err(|e| ChatError::Config(format!("logging already initialized: {e}")))
}

/// Log to the configured file.
///
/// Fails if the file cannot be opened or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file = open_log_file(Path::new(&config.file))?;
    install(Arc::new(file), false, level_filter(&config.level))
}

/// Log to stderr. Used when the log file is unavailable.
pub fn init_console_only(level: &str) {
    if let Err(e) = install(std::io::stderr, true, level_filter(level)) {
        eprintln!("{e}");
    }
}
