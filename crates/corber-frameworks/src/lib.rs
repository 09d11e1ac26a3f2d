//! Corber Frameworks - Web framework adapters for hybrid mobile builds
//!
//! This crate wraps the build and serve tooling of a web framework behind one
//! interface so the rest of corber never needs to know which framework a
//! project uses.
//!
//! ## Supported Frameworks
//!
//! - **Ember**: `ember build` / `ember serve`, with configuration checks for
//!   router location type, root URL and browser targets
//! - **Glimmer**: Ember tooling without the router checks
//!
//! # Layout
//!
//! - [`FrameworkAdapter`] is the contract every framework implements
//! - Tasks ([`BuildTask`], [`ServeTask`], [`UpdateWatchmanConfigTask`]) are
//!   one-shot descriptors executed through a [`TaskRunner`]
//! - Validators are assembled per call and executed through a
//!   [`ValidationRunner`], which reports every failure at once
//! - The [`Orchestrator`] selects the adapter, validates, runs and reports

pub mod command;
pub mod context;
pub mod detection;
pub mod error;
pub mod frameworks;
pub mod orchestration;
pub mod output;
pub mod registry;
pub mod tasks;
pub mod traits;
pub mod validators;

pub use command::command_exists;
pub use context::{BuildOptions, FrameworkOptions, ServeOptions, ValidateOptions};
pub use detection::{Detection, DetectionResult};
pub use error::{FrameworkError, Result};
pub use frameworks::{EmberFactory, EmberFramework};
pub use orchestration::{BuildResult, InstallResult, Orchestrator, OrchestratorConfig, ServeResult};
pub use output::{Output, OutputFormat};
pub use registry::FrameworkRegistry;
pub use tasks::{
    BuildOutput, BuildTask, NativeTaskRunner, ServeRunOptions, ServeSession, ServeTask,
    TaskRunner, Ui, UpdateWatchmanConfigTask, WatchmanUpdate,
};
pub use traits::{FrameworkAdapter, FrameworkFactory};
pub use validators::{
    Check, SequentialRunner, ValidationIssue, ValidationReport, ValidationRunner,
    ValidatorDescriptor,
};
