//! Workflow orchestration for framework operations
//!
//! The orchestrator picks the adapter for a project, runs the configuration
//! checks ahead of builds and serves, applies the post-install policy and
//! turns every result into structured [`Output`].

mod config;

pub use config::OrchestratorConfig;

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};

use corber_core::{Config, SharedProject};

use crate::context::{BuildOptions, FrameworkOptions, ServeOptions};
use crate::detection::DetectionResult;
use crate::error::{FrameworkError, Result};
use crate::output::{Output, OutputFormat};
use crate::registry::FrameworkRegistry;
use crate::tasks::{BuildOutput, ServeSession, WatchmanUpdate};
use crate::traits::FrameworkAdapter;
use crate::validators::ValidationReport;

/// Name reported for the post-install step
const AFTER_INSTALL_STEP: &str = "update-watchman-config";

/// Main orchestrator for all framework operations
pub struct Orchestrator {
    /// Registry of available frameworks
    registry: FrameworkRegistry,

    /// Configuration
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the built-in frameworks
    pub fn new() -> Self {
        Self {
            registry: FrameworkRegistry::with_builtins(),
            config: OrchestratorConfig::default(),
        }
    }

    /// Create with custom registry
    pub fn with_registry(registry: FrameworkRegistry) -> Self {
        Self {
            registry,
            config: OrchestratorConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self {
            registry: FrameworkRegistry::with_builtins(),
            config,
        }
    }

    /// Set configuration
    pub fn config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn settings(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Get reference to registry
    pub fn registry(&self) -> &FrameworkRegistry {
        &self.registry
    }

    // -------------------------------------------------------------------------
    // Adapter selection
    // -------------------------------------------------------------------------

    /// Build the adapter for a project from its configuration file settings
    #[instrument(skip(self, project, file_config), fields(root = %project.root().display()))]
    pub fn select(
        &self,
        project: SharedProject,
        file_config: &Config,
    ) -> Result<Box<dyn FrameworkAdapter>> {
        let options = FrameworkOptions::new(project).with_config(file_config);
        self.registry.create(file_config.framework.name.as_deref(), options)
    }

    /// Detect frameworks in a project
    pub fn detect(&self, path: &Path) -> Vec<DetectionResult> {
        self.registry.detect(path)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Check the configuration, then build
    #[instrument(skip_all, fields(framework = adapter.name(), environment = %options.environment))]
    pub async fn build(
        &self,
        adapter: &dyn FrameworkAdapter,
        options: &BuildOptions,
    ) -> Result<BuildResult> {
        let start = Instant::now();

        let validation = if self.config.skip_validation {
            self.log_warn("Skipping configuration checks");
            None
        } else {
            Some(adapter.validate_build(&self.config.validate_options())?)
        };

        self.log_info(&format!(
            "Building {} ({}) with {}",
            adapter.project().root().display(),
            options.environment,
            adapter.name()
        ));
        let output = adapter.build(options).await?;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            duration_ms,
            output_path = %output.output_path.display(),
            "build completed"
        );

        Ok(BuildResult {
            framework: adapter.name().to_string(),
            output,
            validation,
            duration_ms,
        })
    }

    /// Check the configuration, then start the development server
    #[instrument(skip_all, fields(framework = adapter.name()))]
    pub async fn serve(
        &self,
        adapter: &dyn FrameworkAdapter,
        options: &ServeOptions,
    ) -> Result<ServeResult> {
        let validation = if self.config.skip_validation {
            self.log_warn("Skipping configuration checks");
            None
        } else {
            Some(adapter.validate_serve(&self.config.validate_options())?)
        };

        let session = adapter.serve(options).await?;
        info!(url = %session.url(), "serving");

        Ok(ServeResult {
            framework: adapter.name().to_string(),
            session,
            validation,
        })
    }

    /// Run the configuration checks on their own
    pub fn validate(
        &self,
        adapter: &dyn FrameworkAdapter,
        serve: bool,
    ) -> Result<ValidationReport> {
        let options = self.config.validate_options();
        if serve {
            adapter.validate_serve(&options)
        } else {
            adapter.validate_build(&options)
        }
    }

    /// Run the framework's post-install step under the configured policy
    #[instrument(skip_all, fields(framework = adapter.name(), policy = self.config.after_install.as_str()))]
    pub async fn install(&self, adapter: &dyn FrameworkAdapter) -> Result<InstallResult> {
        match adapter.after_install().await {
            Ok(update) => {
                info!(?update, "post-install step finished");
                Ok(InstallResult {
                    framework: adapter.name().to_string(),
                    update: Some(update),
                    warnings: Vec::new(),
                })
            }
            Err(e) if self.config.after_install.is_fatal() => {
                Err(FrameworkError::AfterInstallFailed {
                    step: AFTER_INSTALL_STEP.to_string(),
                    source: Box::new(e),
                })
            }
            Err(e) => {
                let message = format!("Post-install step '{}' failed: {}", AFTER_INSTALL_STEP, e);
                self.log_warn(&message);
                Ok(InstallResult {
                    framework: adapter.name().to_string(),
                    update: None,
                    warnings: vec![message],
                })
            }
        }
    }

    // -------------------------------------------------------------------------
    // Structured output
    // -------------------------------------------------------------------------

    /// Build and return structured output with the process exit code
    pub async fn build_with_output(
        &self,
        adapter: &dyn FrameworkAdapter,
        options: &BuildOptions,
    ) -> (Output, i32) {
        let format = self.format();
        match self.build(adapter, options).await {
            Ok(result) => {
                let mut output = Output::success("build", "Build completed successfully")
                    .with_duration(result.duration_ms)
                    .with_output("framework", &result.framework)
                    .with_output("environment", &result.output.environment)
                    .with_output("output_path", result.output.output_path.to_string_lossy());
                if let Some(report) = &result.validation {
                    output = output.with_issues_as_warnings(&report.warnings);
                }

                output.print(format);
                (output, 0)
            }
            Err(e) => failure_output("build", e, format),
        }
    }

    /// Validate and return structured output with the process exit code
    pub fn validate_with_output(
        &self,
        adapter: &dyn FrameworkAdapter,
        serve: bool,
    ) -> (Output, i32) {
        let format = self.format();
        match self.validate(adapter, serve) {
            Ok(report) => {
                let output = Output::success(
                    "validate",
                    format!("{} configuration check(s) passed", report.checked.len()),
                )
                .with_output("framework", adapter.name())
                .with_issues_as_warnings(&report.warnings)
                .with_metadata("checked", serde_json::json!(report.checked));

                output.print(format);
                (output, 0)
            }
            Err(e) => failure_output("validate", e, format),
        }
    }

    /// Install and return structured output with the process exit code
    pub async fn install_with_output(&self, adapter: &dyn FrameworkAdapter) -> (Output, i32) {
        let format = self.format();
        match self.install(adapter).await {
            Ok(result) => {
                let mut output = Output::success("install", "Post-install steps completed")
                    .with_output("framework", &result.framework);
                if let Some(update) = result.update {
                    output = output.with_output("watchman_config", update_label(update));
                }
                for warning in result.warnings {
                    output = output.with_warning(warning);
                }

                output.print(format);
                (output, 0)
            }
            Err(e) => failure_output("install", e, format),
        }
    }

    /// Detect and return structured output
    pub fn detect_with_output(&self, path: &Path) -> (Output, i32) {
        let format = self.format();
        let detections = self.detect(path);

        let Some(best) = detections.first() else {
            let message = format!("No framework detected at {}", path.display());
            let output = Output::failure("detect", message)
                .with_metadata("supported", serde_json::json!(self.registry.ids()));
            output.print(format);
            return (output, 2);
        };

        let frameworks: Vec<_> = detections
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.framework_id,
                    "name": d.framework_name,
                    "confidence": d.detection.confidence()
                })
            })
            .collect();

        let output = Output::success("detect", format!("Detected {}", best.framework_name))
            .with_output("framework", &best.framework_id)
            .with_output("confidence", best.detection.confidence().to_string())
            .with_metadata("frameworks", serde_json::json!(frameworks));

        output.print(format);
        (output, 0)
    }

    // -------------------------------------------------------------------------
    // Helper Methods
    // -------------------------------------------------------------------------

    fn format(&self) -> OutputFormat {
        self.config.effective_output_format()
    }

    fn log_info(&self, msg: &str) {
        info!("{}", msg);
        if !self.config.quiet && !self.config.json_output {
            eprintln!("ℹ {}", msg);
        }
    }

    fn log_warn(&self, msg: &str) {
        warn!("{}", msg);
        if !self.config.quiet && !self.config.json_output {
            eprintln!("⚠ {}", msg);
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn failure_output(operation: &str, error: FrameworkError, format: OutputFormat) -> (Output, i32) {
    let mut output = Output::failure(operation, error.to_string());
    if let FrameworkError::ValidationFailed { failures } = &error {
        for failure in failures {
            output = output.with_error(failure.to_string());
        }
    }
    output.print(format);
    (output, error.exit_code())
}

fn update_label(update: WatchmanUpdate) -> &'static str {
    match update {
        WatchmanUpdate::Created => "created",
        WatchmanUpdate::Updated => "updated",
        WatchmanUpdate::Unchanged => "unchanged",
    }
}

/// Result of a build operation
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub framework: String,
    pub output: BuildOutput,
    /// `None` when checks were skipped
    pub validation: Option<ValidationReport>,
    pub duration_ms: u64,
}

/// A started development server
#[derive(Debug)]
pub struct ServeResult {
    pub framework: String,
    pub session: ServeSession,
    pub validation: Option<ValidationReport>,
}

/// Result of the post-install step
#[derive(Debug, Clone)]
pub struct InstallResult {
    pub framework: String,
    /// `None` when the step failed under the warn policy
    pub update: Option<WatchmanUpdate>,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use corber_core::{AfterInstallPolicy, StaticProject};
    use serde_json::json;
    use tempfile::TempDir;

    use crate::context::ValidateOptions;
    use crate::tasks::ServeRunOptions;
    use crate::validators::ValidationIssue;

    /// Adapter double counting calls, with scripted failures
    struct FakeAdapter {
        project: SharedProject,
        fail_validation: bool,
        fail_after_install: bool,
        validations: AtomicUsize,
        builds: AtomicUsize,
    }

    impl FakeAdapter {
        fn new() -> Self {
            Self {
                project: StaticProject::new("/apps/my-app", json!({})).shared(),
                fail_validation: false,
                fail_after_install: false,
                validations: AtomicUsize::new(0),
                builds: AtomicUsize::new(0),
            }
        }

        fn check(&self) -> Result<ValidationReport> {
            self.validations.fetch_add(1, Ordering::SeqCst);
            if self.fail_validation {
                return Err(FrameworkError::ValidationFailed {
                    failures: vec![
                        ValidationIssue::new("location-type", "locationType is 'history'"),
                        ValidationIssue::new("root-url", "rootURL is \"/\""),
                    ],
                });
            }
            Ok(ValidationReport {
                checked: vec!["location-type".to_string()],
                warnings: Vec::new(),
            })
        }
    }

    #[async_trait]
    impl FrameworkAdapter for FakeAdapter {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn build_command(&self) -> Option<&str> {
            None
        }

        fn build_path(&self) -> &str {
            "/dist"
        }

        fn port(&self) -> u16 {
            4200
        }

        fn live_reload_port(&self) -> u16 {
            49153
        }

        fn project(&self) -> &SharedProject {
            &self.project
        }

        async fn build(&self, options: &BuildOptions) -> Result<BuildOutput> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(BuildOutput {
                output_path: options
                    .output_path
                    .clone()
                    .unwrap_or_else(|| "/apps/my-app/dist".into()),
                environment: options.environment.clone(),
                duration_ms: 0,
            })
        }

        async fn serve(&self, options: &ServeOptions) -> Result<ServeSession> {
            Ok(ServeSession::detached(&ServeRunOptions {
                port: options.port.unwrap_or(4200),
                live_reload_port: 49153,
                base_url: "/".to_string(),
                root_url: "/".to_string(),
                project: self.project.clone(),
                environment: options.environment.clone(),
            }))
        }

        fn validate_build(&self, _options: &ValidateOptions) -> Result<ValidationReport> {
            self.check()
        }

        fn validate_serve(&self, _options: &ValidateOptions) -> Result<ValidationReport> {
            self.check()
        }

        async fn after_install(&self) -> Result<WatchmanUpdate> {
            if self.fail_after_install {
                Err(FrameworkError::Serialization("bad .watchmanconfig".to_string()))
            } else {
                Ok(WatchmanUpdate::Updated)
            }
        }
    }

    fn quiet() -> OrchestratorConfig {
        OrchestratorConfig::new().with_quiet(true)
    }

    #[tokio::test]
    async fn test_build_validates_first() {
        let orchestrator = Orchestrator::with_config(quiet());
        let adapter = FakeAdapter::new();

        let result = orchestrator.build(&adapter, &BuildOptions::new()).await.unwrap();
        assert_eq!(result.framework, "fake");
        assert!(result.validation.is_some());
        assert_eq!(adapter.validations.load(Ordering::SeqCst), 1);
        assert_eq!(adapter.builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_validation_stops_build() {
        let orchestrator = Orchestrator::with_config(quiet());
        let adapter = FakeAdapter {
            fail_validation: true,
            ..FakeAdapter::new()
        };

        let err = orchestrator.build(&adapter, &BuildOptions::new()).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(adapter.builds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_skip_validation() {
        let orchestrator = Orchestrator::with_config(quiet().with_skip_validation(true));
        let adapter = FakeAdapter {
            fail_validation: true,
            ..FakeAdapter::new()
        };

        let result = orchestrator.build(&adapter, &BuildOptions::new()).await.unwrap();
        assert!(result.validation.is_none());
        assert_eq!(adapter.validations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_build_with_output_reports_every_failure() {
        let orchestrator = Orchestrator::with_config(quiet().with_json(true));
        let adapter = FakeAdapter {
            fail_validation: true,
            ..FakeAdapter::new()
        };

        let (output, code) = orchestrator
            .build_with_output(&adapter, &BuildOptions::new())
            .await;
        assert!(!output.success);
        assert_eq!(code, 5);
        assert_eq!(output.errors.len(), 2);
    }

    #[tokio::test]
    async fn test_build_success_is_reported_once() {
        let orchestrator = Orchestrator::with_config(quiet());
        let adapter = FakeAdapter::new();

        let (output, code) = orchestrator
            .build_with_output(&adapter, &BuildOptions::new())
            .await;
        assert_eq!(code, 0);
        assert!(output.success);
        assert!(output.outputs.contains_key("output_path"));

        let text = output.render(OutputFormat::Text);
        assert_eq!(text.matches("Build completed").count(), 1);
        assert_eq!(text.lines().filter(|l| l.starts_with('✓')).count(), 1);
    }

    #[tokio::test]
    async fn test_serve_reports_requested_port() {
        let orchestrator = Orchestrator::with_config(quiet());
        let adapter = FakeAdapter::new();

        let result = orchestrator
            .serve(&adapter, &ServeOptions::new().with_port(80))
            .await
            .unwrap();
        assert_eq!(result.session.port, 80);
        assert_eq!(adapter.validations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_install_warn_policy_continues() {
        let orchestrator = Orchestrator::with_config(quiet());
        let adapter = FakeAdapter {
            fail_after_install: true,
            ..FakeAdapter::new()
        };

        let result = orchestrator.install(&adapter).await.unwrap();
        assert!(result.update.is_none());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("bad .watchmanconfig"));
    }

    #[tokio::test]
    async fn test_install_fail_policy_aborts() {
        let orchestrator =
            Orchestrator::with_config(quiet().with_after_install(AfterInstallPolicy::Fail));
        let adapter = FakeAdapter {
            fail_after_install: true,
            ..FakeAdapter::new()
        };

        let err = orchestrator.install(&adapter).await.unwrap_err();
        match err {
            FrameworkError::AfterInstallFailed { step, .. } => {
                assert_eq!(step, "update-watchman-config")
            }
            other => panic!("expected post-install failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_install_success() {
        let orchestrator = Orchestrator::with_config(quiet().with_json(true));
        let adapter = FakeAdapter::new();

        let (output, code) = orchestrator.install_with_output(&adapter).await;
        assert_eq!(code, 0);
        assert_eq!(output.outputs.get("watchman_config").map(String::as_str), Some("updated"));
    }

    #[test]
    fn test_select_uses_configured_name() {
        let temp = TempDir::new().unwrap();
        let project = StaticProject::new(temp.path(), json!({})).shared();
        let mut file_config = Config::default();
        file_config.framework.name = Some("ember".to_string());
        file_config.framework.port = Some(4300);

        let adapter = Orchestrator::new().select(project, &file_config).unwrap();
        assert_eq!(adapter.name(), "ember");
        assert_eq!(adapter.port(), 4300);
    }

    #[test]
    fn test_detect_with_output_without_framework() {
        let temp = TempDir::new().unwrap();
        let orchestrator = Orchestrator::with_config(quiet().with_json(true));

        let (output, code) = orchestrator.detect_with_output(temp.path());
        assert!(!output.success);
        assert_eq!(code, 2);
    }
}
