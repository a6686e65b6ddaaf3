//! File logging. The terminal belongs to the TUI, so events go to a log file.

use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing_appender::non_blocking::WorkerGuard;

pub const LOG_FILE: &str = "pokedex.log";

#[derive(Args, Clone, Debug, PartialEq)]
pub struct LogArgs {
    /// Directory for pokedex.log (defaults to the user cache dir)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
    /// Filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Default for LogArgs {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl LogArgs {
    pub fn resolved_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs_next::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pokedex-tui")
        })
    }
}

/// Installs the global subscriber. Keep the guard alive until exit so buffered
/// lines are flushed.
pub fn init_logging(args: &LogArgs) -> io::Result<WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = args.resolved_dir();
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .map_err(io::Error::other)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}
