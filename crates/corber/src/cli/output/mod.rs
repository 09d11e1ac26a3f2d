//! Output formatting utilities

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use corber_frameworks::OutputFormat as FrameworkOutputFormat;

use super::{Cli, OutputFormat};

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}

/// Print an info message
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").blue(), message);
}

/// Map the CLI format onto the library's output format
pub fn framework_format(format: OutputFormat) -> FrameworkOutputFormat {
    match format {
        OutputFormat::Text => FrameworkOutputFormat::Text,
        OutputFormat::Json => FrameworkOutputFormat::Json,
    }
}

/// Spinner shown while a native tool runs; hidden for quiet or JSON runs
pub fn spinner(cli: &Cli, message: impl Into<String>) -> ProgressBar {
    if !cli.is_interactive() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.into());
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar
}
