//! Build task

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use corber_core::SharedProject;

use crate::error::{FrameworkError, Result};

use super::{ember_command, shell_command};

/// Compile the web application into `output_path`
#[derive(Clone)]
pub struct BuildTask {
    pub project: SharedProject,
    pub environment: String,
    pub output_path: PathBuf,
    /// Shell command replacing `ember build`
    pub build_command: Option<String>,
}

/// What a finished build produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
    pub output_path: PathBuf,
    pub environment: String,
    pub duration_ms: u64,
}

impl BuildTask {
    pub fn new(
        project: SharedProject,
        environment: impl Into<String>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project,
            environment: environment.into(),
            output_path: output_path.into(),
            build_command: None,
        }
    }

    pub fn with_build_command(mut self, command: Option<String>) -> Self {
        self.build_command = command;
        self
    }

    /// Run the native build to completion
    #[instrument(skip(self), fields(environment = %self.environment, output = %self.output_path.display()))]
    pub async fn run(self) -> Result<BuildOutput> {
        let start = Instant::now();
        let root = self.project.root();

        let (mut cmd, label) = match &self.build_command {
            Some(script) => {
                // Custom commands learn the requested build through the environment.
                let mut cmd = shell_command(root, script);
                cmd.env("CORBER_ENVIRONMENT", &self.environment)
                    .env("CORBER_OUTPUT_PATH", &self.output_path);
                (cmd, script.clone())
            }
            None => {
                let (mut cmd, invocation) = ember_command(root);
                cmd.arg("build")
                    .arg("--environment")
                    .arg(&self.environment)
                    .arg("--output-path")
                    .arg(&self.output_path);
                (cmd, format!("{} build", invocation))
            }
        };

        info!(command = %label, "starting build");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FrameworkError::tool_not_found(
                    label.split_whitespace().next().unwrap_or("ember"),
                    "Install Node.js and ember-cli (npm install -g ember-cli)",
                )
            } else {
                FrameworkError::Io(e)
            }
        })?;

        debug!(stdout = %String::from_utf8_lossy(&output.stdout), "build output");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("`{}` exited with {}", label, output.status)
            } else {
                stderr
            };
            return Err(FrameworkError::build_failed(message, output.status.code()));
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(duration_ms, "build finished");

        Ok(BuildOutput {
            output_path: self.output_path,
            environment: self.environment,
            duration_ms,
        })
    }
}

impl fmt::Debug for BuildTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildTask")
            .field("root", &self.project.root())
            .field("environment", &self.environment)
            .field("output_path", &self.output_path)
            .field("build_command", &self.build_command)
            .finish()
    }
}
