//! One-shot tasks delegating to framework-native tooling
//!
//! A task is a plain descriptor; `run` consumes it, so a task can only ever
//! run once. Adapters hand descriptors to a [`TaskRunner`] instead of running
//! them directly, which keeps native processes out of adapter tests.

mod build;
mod serve;
mod watchman;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::command::command_exists;
use crate::error::Result;

pub use build::{BuildOutput, BuildTask};
pub use serve::{ServeRunOptions, ServeSession, ServeTask};
pub use watchman::{UpdateWatchmanConfigTask, WatchmanUpdate, WATCHMAN_CONFIG_FILE};

/// How native tool output is surfaced while a task runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ui {
    /// Forward native output at info level instead of debug
    pub verbose: bool,
}

impl Ui {
    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

/// Executes task descriptors on behalf of an adapter
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Run a build to completion
    async fn build(&self, task: BuildTask) -> Result<BuildOutput>;

    /// Start a development server; resolves once it is serving
    async fn serve(&self, task: ServeTask, options: ServeRunOptions) -> Result<ServeSession>;

    /// Update the file-watcher exclusions
    async fn update_watchman_config(&self, task: UpdateWatchmanConfigTask)
        -> Result<WatchmanUpdate>;
}

/// Runs tasks against the real native tools
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTaskRunner;

#[async_trait]
impl TaskRunner for NativeTaskRunner {
    async fn build(&self, task: BuildTask) -> Result<BuildOutput> {
        task.run().await
    }

    async fn serve(&self, task: ServeTask, options: ServeRunOptions) -> Result<ServeSession> {
        task.run(options).await
    }

    async fn update_watchman_config(
        &self,
        task: UpdateWatchmanConfigTask,
    ) -> Result<WatchmanUpdate> {
        task.run().await
    }
}

/// Build a command invoking the Ember CLI for the project at `root`.
///
/// Prefers the project-local binary, then a global `ember`, then `npx ember`.
pub(crate) fn ember_command(root: &Path) -> (Command, String) {
    let local = root.join("node_modules").join(".bin").join(if cfg!(windows) {
        "ember.cmd"
    } else {
        "ember"
    });

    let (mut cmd, label) = if local.is_file() {
        (Command::new(&local), "ember".to_string())
    } else if command_exists("ember") {
        (Command::new("ember"), "ember".to_string())
    } else {
        let mut cmd = Command::new("npx");
        cmd.arg("ember");
        (cmd, "npx ember".to_string())
    };

    debug!(root = %root.display(), invocation = %label, "resolved ember cli");
    cmd.current_dir(root);
    (cmd, label)
}

/// Build a command running `script` through the platform shell
pub(crate) fn shell_command(root: &Path, script: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(script);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    };
    cmd.current_dir(root);
    cmd
}
