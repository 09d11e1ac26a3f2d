//! Error types for framework adapters

use std::path::PathBuf;
use thiserror::Error;

use corber_core::CorberError;

use crate::validators::ValidationIssue;

/// Result type for framework operations
pub type Result<T> = std::result::Result<T, FrameworkError>;

/// Framework adapter errors
#[derive(Error, Debug)]
pub enum FrameworkError {
    /// No framework detected for the project
    #[error("No framework detected at {path}. Supported frameworks: {supported}")]
    NoFrameworkDetected { path: PathBuf, supported: String },

    /// Multiple frameworks detected, disambiguation required
    #[error("Multiple frameworks detected: {frameworks:?}. Set framework.name in corber.toml")]
    AmbiguousFramework { frameworks: Vec<String> },

    /// Framework requested by name is not registered
    #[error("Unknown framework '{name}'. Supported frameworks: {supported}")]
    UnknownFramework { name: String, supported: String },

    /// Framework tool not installed
    #[error("Required tool '{tool}' not found. {install_hint}")]
    ToolNotFound { tool: String, install_hint: String },

    /// One or more validators rejected the project configuration
    #[error("{} configuration check(s) failed:\n{}", .failures.len(), render_issues(.failures))]
    ValidationFailed { failures: Vec<ValidationIssue> },

    /// Native build failed
    #[error("Build failed: {message}")]
    BuildFailed {
        message: String,
        exit_code: Option<i32>,
    },

    /// Native serve process failed before it started serving
    #[error("Serve failed: {message}")]
    ServeFailed {
        message: String,
        exit_code: Option<i32>,
    },

    /// Post-install step failed
    #[error("Post-install step '{step}' failed: {source}")]
    AfterInstallFailed {
        step: String,
        #[source]
        source: Box<FrameworkError>,
    },

    /// Project or configuration file error
    #[error(transparent)]
    Core(#[from] CorberError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error with context
    #[error("{context}: {message}")]
    Context { context: String, message: String },
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

impl FrameworkError {
    /// Create a context error
    pub fn context(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a build failed error
    pub fn build_failed(message: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::BuildFailed {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a tool not found error with install hint
    pub fn tool_not_found(tool: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool: tool.into(),
            install_hint: install_hint.into(),
        }
    }

    /// Whether the error comes from a configuration check the user can fix
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    /// Get exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoFrameworkDetected { .. } => 2,
            Self::AmbiguousFramework { .. } => 2,
            Self::UnknownFramework { .. } => 2,
            Self::ToolNotFound { .. } => 3,
            Self::Core(_) => 4,
            Self::ValidationFailed { .. } => 5,
            Self::BuildFailed { .. } => 10,
            Self::ServeFailed { .. } => 11,
            Self::AfterInstallFailed { .. } => 12,
            Self::Io(_) => 7,
            Self::Serialization(_) => 8,
            Self::Context { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_lists_every_issue() {
        let err = FrameworkError::ValidationFailed {
            failures: vec![
                ValidationIssue::new("location-type", "locationType must be 'hash'"),
                ValidationIssue::new("root-url", "rootURL must be ''"),
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("2 configuration check(s) failed"));
        assert!(message.contains("[location-type] locationType must be 'hash'"));
        assert!(message.contains("[root-url] rootURL must be ''"));
        assert_eq!(err.exit_code(), 5);
        assert!(err.is_validation());
    }

    #[test]
    fn test_after_install_wraps_source() {
        let err = FrameworkError::AfterInstallFailed {
            step: "update-watchman-config".to_string(),
            source: Box::new(FrameworkError::Serialization("bad json".to_string())),
        };

        assert!(err.to_string().contains("update-watchman-config"));
        assert!(err.to_string().contains("bad json"));
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn test_native_failures_have_distinct_exit_codes() {
        let build = FrameworkError::build_failed("ember exited", Some(1));
        let serve = FrameworkError::ServeFailed {
            message: "port in use".to_string(),
            exit_code: Some(1),
        };
        let missing = FrameworkError::tool_not_found("ember", "npm install -g ember-cli");

        assert_eq!(build.exit_code(), 10);
        assert_eq!(serve.exit_code(), 11);
        assert_eq!(missing.exit_code(), 3);
        assert!(missing.to_string().contains("npm install -g ember-cli"));
    }
}
