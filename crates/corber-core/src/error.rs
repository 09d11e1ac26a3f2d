//! Error types for Corber

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using CorberError
pub type Result<T> = std::result::Result<T, CorberError>;

/// Main error type for Corber core operations
#[derive(Debug, Error)]
pub enum CorberError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Project access errors
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while opening a web project
#[derive(Debug, Error)]
pub enum ProjectError {
    /// Project root does not exist or is not a directory
    #[error("Project root not found at {0}")]
    RootNotFound(PathBuf),

    /// Framework configuration file is missing
    #[error("Framework configuration not found at {0}")]
    ConfigNotFound(PathBuf),

    /// Evaluating the framework configuration failed
    #[error("Failed to evaluate {path}: {message}")]
    EvaluationFailed { path: PathBuf, message: String },

    /// The evaluated configuration is not an object
    #[error("Framework configuration at {path} is not an object")]
    NotAnObject { path: PathBuf },
}

impl CorberError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
