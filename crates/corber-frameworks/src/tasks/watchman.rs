//! Watchman configuration task
//!
//! Keeps the native platform directory out of the file watcher so that
//! native builds do not trigger web rebuilds.

use std::fmt;
use std::path::PathBuf;

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use corber_core::SharedProject;

use crate::error::{FrameworkError, Result};

/// Watchman configuration file name, relative to the project root
pub const WATCHMAN_CONFIG_FILE: &str = ".watchmanconfig";

const IGNORE_DIRS: &str = "ignore_dirs";

/// What the task did to the watchman configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchmanUpdate {
    Created,
    Updated,
    Unchanged,
}

/// Add the platform directory to `.watchmanconfig`'s `ignore_dirs`
#[derive(Clone)]
pub struct UpdateWatchmanConfigTask {
    pub project: SharedProject,
    pub platform_dir: String,
}

impl UpdateWatchmanConfigTask {
    pub fn new(project: SharedProject, platform_dir: impl Into<String>) -> Self {
        Self {
            project,
            platform_dir: platform_dir.into(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.project.root().join(WATCHMAN_CONFIG_FILE)
    }

    #[instrument(skip(self), fields(platform_dir = %self.platform_dir))]
    pub async fn run(self) -> Result<WatchmanUpdate> {
        let path = self.config_path();

        if !path.exists() {
            let config = json!({ IGNORE_DIRS: ["tmp", "dist", self.platform_dir] });
            write_config(&path, &config).await?;
            info!(path = %path.display(), "created watchman config");
            return Ok(WatchmanUpdate::Created);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        let mut config: Value = if content.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&content).map_err(|e| {
                FrameworkError::Serialization(format!("{}: {}", path.display(), e))
            })?
        };

        let object = config.as_object_mut().ok_or_else(|| {
            FrameworkError::Serialization(format!("{}: expected a JSON object", path.display()))
        })?;

        let dirs = object
            .entry(IGNORE_DIRS)
            .or_insert_with(|| Value::Array(Vec::new()));
        let dirs = dirs.as_array_mut().ok_or_else(|| {
            FrameworkError::Serialization(format!(
                "{}: `{}` must be an array",
                path.display(),
                IGNORE_DIRS
            ))
        })?;

        if dirs.iter().any(|d| d.as_str() == Some(self.platform_dir.as_str())) {
            debug!(path = %path.display(), "platform directory already ignored");
            return Ok(WatchmanUpdate::Unchanged);
        }

        dirs.push(Value::String(self.platform_dir.clone()));
        write_config(&path, &config).await?;
        info!(path = %path.display(), "updated watchman config");
        Ok(WatchmanUpdate::Updated)
    }
}

async fn write_config(path: &std::path::Path, config: &Value) -> Result<()> {
    let mut content = serde_json::to_string_pretty(config)
        .map_err(|e| FrameworkError::Serialization(e.to_string()))?;
    content.push('\n');
    tokio::fs::write(path, content).await?;
    Ok(())
}

impl fmt::Debug for UpdateWatchmanConfigTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateWatchmanConfigTask")
            .field("root", &self.project.root())
            .field("platform_dir", &self.platform_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corber_core::StaticProject;
    use tempfile::TempDir;

    fn task(dir: &TempDir) -> UpdateWatchmanConfigTask {
        let project = StaticProject::new(dir.path(), json!({})).shared();
        UpdateWatchmanConfigTask::new(project, "corber")
    }

    fn read(dir: &TempDir) -> Value {
        let content = std::fs::read_to_string(dir.path().join(WATCHMAN_CONFIG_FILE)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[tokio::test]
    async fn test_creates_missing_config() {
        let temp = TempDir::new().unwrap();

        let update = task(&temp).run().await.unwrap();
        assert_eq!(update, WatchmanUpdate::Created);
        assert_eq!(read(&temp), json!({ "ignore_dirs": ["tmp", "dist", "corber"] }));
    }

    #[tokio::test]
    async fn test_appends_platform_dir_and_keeps_other_keys() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(WATCHMAN_CONFIG_FILE),
            r#"{"ignore_dirs": ["tmp"], "settle": 200}"#,
        )
        .unwrap();

        let update = task(&temp).run().await.unwrap();
        assert_eq!(update, WatchmanUpdate::Updated);
        assert_eq!(
            read(&temp),
            json!({ "ignore_dirs": ["tmp", "corber"], "settle": 200 })
        );
    }

    #[tokio::test]
    async fn test_second_run_is_unchanged() {
        let temp = TempDir::new().unwrap();

        task(&temp).run().await.unwrap();
        let update = task(&temp).run().await.unwrap();
        assert_eq!(update, WatchmanUpdate::Unchanged);
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(WATCHMAN_CONFIG_FILE), "{ nope").unwrap();

        let err = task(&temp).run().await.unwrap_err();
        assert!(matches!(err, FrameworkError::Serialization(_)));
    }
}
