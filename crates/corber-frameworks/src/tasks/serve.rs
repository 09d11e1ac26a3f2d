//! Serve task
//!
//! Starts the framework's development server and resolves once it reports
//! that it is serving. The server keeps running until it exits on its own
//! or the returned session is stopped or dropped.

use std::fmt;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use corber_core::SharedProject;

use crate::error::{FrameworkError, Result};

use super::{ember_command, Ui};

/// Lines announcing that the development server is up
const STARTED_MARKERS: &[&str] = &["Serving on", "Build successful"];

/// Start the development server
#[derive(Clone)]
pub struct ServeTask {
    pub project: SharedProject,
    pub ui: Ui,
}

/// Options for one serve run
#[derive(Clone)]
pub struct ServeRunOptions {
    pub port: u16,
    pub live_reload_port: u16,
    pub base_url: String,
    pub root_url: String,
    pub project: SharedProject,
    pub environment: String,
}

impl ServeTask {
    pub fn new(project: SharedProject, ui: Ui) -> Self {
        Self { project, ui }
    }

    /// Spawn the server and wait until it is serving
    #[instrument(skip(self, options), fields(port = options.port, live_reload_port = options.live_reload_port))]
    pub async fn run(self, options: ServeRunOptions) -> Result<ServeSession> {
        let (mut cmd, invocation) = ember_command(options.project.root());
        cmd.arg("serve")
            .arg("--port")
            .arg(options.port.to_string())
            .arg("--live-reload-port")
            .arg(options.live_reload_port.to_string())
            .arg("--environment")
            .arg(&options.environment)
            // Read by config/environment.js to serve from "/" instead of the
            // empty root URL used for device builds.
            .env("CORBER_BASE_URL", &options.base_url)
            .env("CORBER_ROOT_URL", &options.root_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(command = %format!("{} serve", invocation), "starting development server");
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FrameworkError::tool_not_found(
                    invocation.split_whitespace().next().unwrap_or("ember"),
                    "Install Node.js and ember-cli (npm install -g ember-cli)",
                )
            } else {
                FrameworkError::Io(e)
            }
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FrameworkError::context("serve", "stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| FrameworkError::context("serve", "stderr was not captured"))?;

        let (started_tx, started_rx) = watch::channel(false);
        let stderr_log = tokio::spawn(drain_stderr(stderr, self.ui, started_rx));
        let mut lines = BufReader::new(stdout).lines();

        loop {
            match lines.next_line().await? {
                Some(line) => {
                    forward_line(&line, self.ui);
                    if STARTED_MARKERS.iter().any(|m| line.contains(m)) {
                        // The stderr reader stops buffering from here on.
                        let _ = started_tx.send(true);
                        break;
                    }
                }
                None => {
                    let status = child.wait().await?;
                    let stderr = stderr_log.await.unwrap_or_default().join("\n");
                    let message = if stderr.trim().is_empty() {
                        format!("development server exited with {} before serving", status)
                    } else {
                        stderr.trim().to_string()
                    };
                    return Err(FrameworkError::ServeFailed {
                        message,
                        exit_code: status.code(),
                    });
                }
            }
        }

        let ui = self.ui;
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                forward_line(&line, ui);
            }
        });

        let session = ServeSession::attached(&options, child);
        info!(url = %session.url(), "development server started");
        Ok(session)
    }
}

fn forward_line(line: &str, ui: Ui) {
    if ui.verbose {
        info!(target: "corber::serve", "{}", line);
    } else {
        debug!(target: "corber::serve", "{}", line);
    }
}

fn forward_error_line(line: &str, ui: Ui) {
    if ui.verbose {
        warn!(target: "corber::serve", "{}", line);
    } else {
        debug!(target: "corber::serve", "{}", line);
    }
}

/// Forward stderr to tracing for the life of the server.
///
/// Lines are also kept until the server reports it started, so an early exit
/// can be explained; the buffer is released once `started` flips.
async fn drain_stderr<R: AsyncRead + Unpin>(
    reader: R,
    ui: Ui,
    started: watch::Receiver<bool>,
) -> Vec<String> {
    let mut collected = Vec::new();
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        forward_error_line(&line, ui);
        if *started.borrow() {
            if !collected.is_empty() {
                collected = Vec::new();
            }
        } else {
            collected.push(line);
        }
    }
    collected
}

/// A running (or, for test doubles, pretend) development server
pub struct ServeSession {
    pub port: u16,
    pub live_reload_port: u16,
    pub base_url: String,
    pub root_url: String,
    project: SharedProject,
    child: Option<Child>,
}

impl ServeSession {
    fn attached(options: &ServeRunOptions, child: Child) -> Self {
        Self {
            child: Some(child),
            ..Self::detached(options)
        }
    }

    /// A session with no process behind it
    pub fn detached(options: &ServeRunOptions) -> Self {
        Self {
            port: options.port,
            live_reload_port: options.live_reload_port,
            base_url: options.base_url.clone(),
            root_url: options.root_url.clone(),
            project: options.project.clone(),
            child: None,
        }
    }

    /// Project being served
    pub fn project(&self) -> &SharedProject {
        &self.project
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}{}", self.port, self.root_url)
    }

    /// Whether a native server process backs this session
    pub fn is_attached(&self) -> bool {
        self.child.is_some()
    }

    /// Wait until the server process exits on its own
    pub async fn wait(&mut self) -> Result<()> {
        let Some(child) = self.child.as_mut() else {
            return Ok(());
        };

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(FrameworkError::ServeFailed {
                message: format!("development server exited with {}", status),
                exit_code: status.code(),
            })
        }
    }

    /// Kill the server process, if it is still running, and reap it
    pub async fn stop(mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            if child.try_wait()?.is_none() {
                debug!(port = self.port, "stopping development server");
                child.kill().await?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ServeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServeSession")
            .field("port", &self.port)
            .field("live_reload_port", &self.live_reload_port)
            .field("base_url", &self.base_url)
            .field("root_url", &self.root_url)
            .field("root", &self.project.root())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl fmt::Debug for ServeTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServeTask")
            .field("root", &self.project.root())
            .field("ui", &self.ui)
            .finish()
    }
}

impl fmt::Debug for ServeRunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServeRunOptions")
            .field("port", &self.port)
            .field("live_reload_port", &self.live_reload_port)
            .field("base_url", &self.base_url)
            .field("root_url", &self.root_url)
            .field("root", &self.project.root())
            .field("environment", &self.environment)
            .finish()
    }
}
