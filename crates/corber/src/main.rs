//! Corber - build and serve the web layer of hybrid mobile apps

mod cli;
mod exit_codes;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::Cli;

/// Log file name inside the log directory; rotated daily
const LOG_FILE: &str = "corber.log";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli);

    cli.execute()
}

/// Set up tracing with two layers:
/// - Console on stderr: RUST_LOG, else a level picked from `--verbose`/`--quiet`
/// - File: debug-level JSON, including native server output, in the log directory
fn init_tracing(cli: &Cli) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_directive(cli.verbose, cli.quiet)));
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(cli.verbose)
        .with_filter(console_filter);

    let Some(log_dir) = log_directory(std::env::var_os("CORBER_LOG_DIR").map(PathBuf::from))
    else {
        tracing_subscriber::registry().with(console).init();
        return None;
    };

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(console)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_filter(EnvFilter::new("debug")),
        )
        .init();

    Some(guard)
}

/// Console level when RUST_LOG is unset.
///
/// `--verbose` shows the dev server's own output, which is logged under
/// `corber::serve` at info (stdout) and warn (stderr).
fn console_directive(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (_, true) => "error",
        (true, false) => "warn,corber::serve=info",
        (false, false) => "warn",
    }
}

/// Log directory: `override_dir` when given, else `~/.corber/logs`.
///
/// Created if needed; `None` when it cannot be, which leaves console logging only.
fn log_directory(override_dir: Option<PathBuf>) -> Option<PathBuf> {
    let log_dir = match override_dir {
        Some(dir) => dir,
        None => dirs::home_dir()?.join(".corber").join("logs"),
    };
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_directive() {
        assert_eq!(console_directive(false, false), "warn");
        assert_eq!(console_directive(true, false), "warn,corber::serve=info");
        assert_eq!(console_directive(true, true), "error");
        assert!(EnvFilter::try_new(console_directive(true, false)).is_ok());
    }

    #[test]
    fn test_log_directory_override_is_created() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("logs").join("corber");

        assert_eq!(log_directory(Some(dir.clone())), Some(dir.clone()));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_unusable_log_directory_falls_back_to_console() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("not-a-dir");
        std::fs::write(&file, "").unwrap();

        assert_eq!(log_directory(Some(file)), None);
    }
}
