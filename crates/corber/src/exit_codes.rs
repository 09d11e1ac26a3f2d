//! Exit codes for the CLI
//!
//! Framework failures carry their own codes (`FrameworkError::exit_code`);
//! these cover failures that happen before an adapter exists.

/// General error
pub const ERROR: i32 = 1;

/// Configuration file or project configuration could not be loaded
pub const CONFIG_ERROR: i32 = 4;

/// User cancelled
pub const CANCELLED: i32 = 130;
