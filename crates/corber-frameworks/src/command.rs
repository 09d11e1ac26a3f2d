//! Command availability check

use std::process::{Command, Stdio};

use tracing::trace;

/// Check whether `name` resolves to an executable on this machine.
///
/// Looks the name up on `PATH` first, then asks the platform shell
/// (`command -v` on POSIX, `where` on Windows), which also sees shell
/// builtins and functions. Never fails: any error means "not available".
pub fn command_exists(name: &str) -> bool {
    if name.trim().is_empty() {
        return false;
    }

    if which::which(name).is_ok() {
        trace!(command = name, "found on PATH");
        return true;
    }

    let found = shell_lookup(name);
    trace!(command = name, found, "shell lookup");
    found
}

#[cfg(windows)]
fn shell_lookup(name: &str) -> bool {
    Command::new("where")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn shell_lookup(name: &str) -> bool {
    // The name is a positional parameter, never spliced into the script.
    Command::new("sh")
        .arg("-c")
        .arg(r#"command -v "$1""#)
        .arg("sh")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
