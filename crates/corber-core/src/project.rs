//! Web project access
//!
//! Framework adapters never read project files directly for configuration;
//! they go through a [`Project`], which exposes the project root and the
//! framework configuration evaluated once when the project was opened.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ProjectError, Result};

/// Project-relative path of the Ember environment configuration
pub const ENVIRONMENT_CONFIG_PATH: &str = "config/environment.js";

/// Read-only view of the web project being orchestrated
pub trait Project: Send + Sync + fmt::Debug {
    /// Absolute path of the project root
    fn root(&self) -> &Path;

    /// Framework configuration (router location type, root URL variants, ...)
    fn config(&self) -> &Value;
}

/// Shared handle to a project, held by adapters and task descriptors
pub type SharedProject = Arc<dyn Project>;

/// A project whose configuration is already in memory
#[derive(Debug, Clone, PartialEq)]
pub struct StaticProject {
    root: PathBuf,
    config: Value,
}

impl StaticProject {
    pub fn new(root: impl Into<PathBuf>, config: Value) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Wrap in a shared handle
    pub fn shared(self) -> SharedProject {
        Arc::new(self)
    }
}

impl Project for StaticProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn config(&self) -> &Value {
        &self.config
    }
}

/// An Ember (or Glimmer) project on disk
///
/// `config/environment.js` is a CommonJS module exporting a function of the
/// environment name, so it is evaluated with `node` rather than parsed.
pub struct EmberProject {
    root: PathBuf,
    environment: String,
    config: Value,
}

const EVALUATE_ENVIRONMENT_JS: &str = r#"
const path = require('path');
const environment = process.argv[1] || 'development';
const factory = require(path.resolve('config', 'environment.js'));
const config = typeof factory === 'function' ? factory(environment) : factory;
process.stdout.write(JSON.stringify(config === undefined ? {} : config));
"#;

impl EmberProject {
    /// Open the project at `root`, evaluating its configuration for `environment`
    pub fn open(root: impl Into<PathBuf>, environment: &str) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ProjectError::RootNotFound(root).into());
        }

        let config = evaluate_environment(&root, environment)?;
        info!(root = %root.display(), environment, "opened ember project");

        Ok(Self {
            root,
            environment: environment.to_string(),
            config,
        })
    }

    /// Environment the configuration was evaluated for
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Wrap in a shared handle
    pub fn shared(self) -> SharedProject {
        Arc::new(self)
    }
}

impl fmt::Debug for EmberProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmberProject")
            .field("root", &self.root)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl Project for EmberProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn config(&self) -> &Value {
        &self.config
    }
}

fn evaluate_environment(root: &Path, environment: &str) -> Result<Value> {
    let config_path = root.join(ENVIRONMENT_CONFIG_PATH);
    if !config_path.is_file() {
        return Err(ProjectError::ConfigNotFound(config_path).into());
    }

    debug!(path = %config_path.display(), environment, "evaluating environment config");
    let output = Command::new("node")
        .arg("-e")
        .arg(EVALUATE_ENVIRONMENT_JS)
        .arg(environment)
        .current_dir(root)
        .output()
        .map_err(|e| ProjectError::EvaluationFailed {
            path: config_path.clone(),
            message: format!("could not run node: {}", e),
        })?;

    if !output.status.success() {
        return Err(ProjectError::EvaluationFailed {
            path: config_path,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    parse_config_output(&config_path, &output.stdout)
}

fn parse_config_output(config_path: &Path, stdout: &[u8]) -> Result<Value> {
    let value: Value =
        serde_json::from_slice(stdout).map_err(|e| ProjectError::EvaluationFailed {
            path: config_path.to_path_buf(),
            message: format!("invalid JSON output: {}", e),
        })?;

    if !value.is_object() {
        return Err(ProjectError::NotAnObject {
            path: config_path.to_path_buf(),
        }
        .into());
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorberError;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_static_project_accessors() {
        let project = StaticProject::new("/app", json!({ "locationType": "hash" }));
        assert_eq!(project.root(), Path::new("/app"));
        assert_eq!(project.config()["locationType"], "hash");
    }

    #[test]
    fn test_open_missing_root() {
        let err = EmberProject::open("/definitely/not/a/project", "development").unwrap_err();
        assert!(matches!(
            err,
            CorberError::Project(ProjectError::RootNotFound(_))
        ));
    }

    #[test]
    fn test_open_missing_environment_config() {
        let temp = TempDir::new().unwrap();
        let err = EmberProject::open(temp.path(), "development").unwrap_err();
        assert!(matches!(
            err,
            CorberError::Project(ProjectError::ConfigNotFound(_))
        ));
    }

    #[test]
    fn test_parse_config_output() {
        let path = Path::new("config/environment.js");
        let value = parse_config_output(path, br#"{"rootURL":""}"#).unwrap();
        assert_eq!(value["rootURL"], "");

        assert!(parse_config_output(path, b"[1, 2]").is_err());
        assert!(parse_config_output(path, b"not json").is_err());
    }
}
