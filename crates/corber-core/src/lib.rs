//! Corber Core - Shared foundations for the Corber build orchestrator
//!
//! This crate provides the project collaborator that framework adapters read
//! from, the optional `corber.toml`/`corber.yaml` configuration file, and the
//! error types shared by the rest of the workspace.

pub mod config;
pub mod error;
pub mod project;

pub use config::{AfterInstallPolicy, Config, FrameworkConfig, InstallConfig, NativeConfig};
pub use error::{ConfigError, CorberError, ProjectError, Result};
pub use project::{EmberProject, Project, SharedProject, StaticProject};
