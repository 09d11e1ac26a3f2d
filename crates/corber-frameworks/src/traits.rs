//! Core traits for framework adapters
//!
//! Every web framework variant implements [`FrameworkAdapter`]; the
//! orchestration layer only ever holds a `dyn FrameworkAdapter` and never
//! branches on which framework is behind it.

use std::path::Path;

use async_trait::async_trait;

use corber_core::SharedProject;

use crate::context::{BuildOptions, FrameworkOptions, ServeOptions, ValidateOptions};
use crate::detection::Detection;
use crate::error::Result;
use crate::tasks::{BuildOutput, ServeSession, WatchmanUpdate};
use crate::validators::ValidationReport;

/// Uniform build/serve/validate/post-install interface over a web framework
#[async_trait]
pub trait FrameworkAdapter: Send + Sync {
    /// Stable identifier (e.g. "ember")
    fn name(&self) -> &'static str;

    /// Shell command replacing the framework's native build, if configured
    fn build_command(&self) -> Option<&str>;

    /// Default build output directory (e.g. "/dist")
    fn build_path(&self) -> &str;

    /// Default development server port
    fn port(&self) -> u16;

    /// Default live-reload port
    fn live_reload_port(&self) -> u16;

    /// Project this adapter operates on
    fn project(&self) -> &SharedProject;

    /// Compile the application into the requested output directory
    async fn build(&self, options: &BuildOptions) -> Result<BuildOutput>;

    /// Start the development server; resolves once it is serving
    async fn serve(&self, options: &ServeOptions) -> Result<ServeSession>;

    /// Check the project configuration before a build
    fn validate_build(&self, options: &ValidateOptions) -> Result<ValidationReport>;

    /// Check the project configuration before serving
    fn validate_serve(&self, options: &ValidateOptions) -> Result<ValidationReport>;

    /// One-time setup after the framework is wired into a project
    async fn after_install(&self) -> Result<WatchmanUpdate>;
}

/// Detects and constructs one framework variant
pub trait FrameworkFactory: Send + Sync {
    /// Identifier matching the adapter's `name()`
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Whether the project at `path` uses this framework
    fn detect(&self, path: &Path) -> Detection;

    /// Build an adapter for the given options
    fn create(&self, options: FrameworkOptions) -> Box<dyn FrameworkAdapter>;
}
