//! Ember framework adapter
//!
//! Builds with `ember build`, serves with `ember serve` and checks that the
//! application's router and URL settings work when loaded from the device
//! filesystem. Glimmer applications use the same tooling but none of the
//! router conventions, so they skip the configuration checks.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use corber_core::config::DEFAULT_PLATFORM_DIR;
use corber_core::project::ENVIRONMENT_CONFIG_PATH;
use corber_core::SharedProject;

use crate::context::{BuildOptions, FrameworkOptions, ServeOptions, ValidateOptions};
use crate::detection::{any_file_exists, has_npm_dependency, Detection};
use crate::error::Result;
use crate::tasks::{
    BuildOutput, BuildTask, NativeTaskRunner, ServeRunOptions, ServeSession, ServeTask,
    TaskRunner, UpdateWatchmanConfigTask, WatchmanUpdate,
};
use crate::traits::{FrameworkAdapter, FrameworkFactory};
use crate::validators::{
    BrowserTargetsValidator, LocationTypeValidator, RootUrlValidator, SequentialRunner,
    ValidationReport, ValidationRunner, ValidatorDescriptor,
};

/// Ember adapter
pub struct EmberFramework {
    project: SharedProject,
    build_command: Option<String>,
    build_path: String,
    port: u16,
    live_reload_port: u16,
    is_glimmer: bool,
    platform_dir: String,
    tasks: Arc<dyn TaskRunner>,
    validation: Arc<dyn ValidationRunner>,
}

impl EmberFramework {
    pub const NAME: &'static str = "ember";
    pub const DEFAULT_BUILD_PATH: &'static str = "/dist";
    pub const DEFAULT_PORT: u16 = 4200;
    pub const DEFAULT_LIVE_RELOAD_PORT: u16 = 49153;

    /// Adapter running the native Ember tooling
    pub fn new(options: FrameworkOptions) -> Self {
        Self {
            project: options.project,
            build_command: options.build_command,
            build_path: options
                .build_path
                .unwrap_or_else(|| Self::DEFAULT_BUILD_PATH.to_string()),
            port: options.port.unwrap_or(Self::DEFAULT_PORT),
            live_reload_port: options
                .live_reload_port
                .unwrap_or(Self::DEFAULT_LIVE_RELOAD_PORT),
            is_glimmer: options.is_glimmer.unwrap_or(false),
            platform_dir: options
                .platform_dir
                .unwrap_or_else(|| DEFAULT_PLATFORM_DIR.to_string()),
            tasks: Arc::new(NativeTaskRunner),
            validation: Arc::new(SequentialRunner),
        }
    }

    pub fn with_task_runner(mut self, tasks: Arc<dyn TaskRunner>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_validation_runner(mut self, validation: Arc<dyn ValidationRunner>) -> Self {
        self.validation = validation;
        self
    }

    pub fn is_glimmer(&self) -> bool {
        self.is_glimmer
    }

    /// Assemble the configuration checks for one validation call.
    ///
    /// Every descriptor captures the project's current configuration. `force`
    /// is handed to the checks that can downgrade failures to warnings.
    pub fn build_validators(&self, options: &ValidateOptions) -> Vec<ValidatorDescriptor> {
        if self.is_glimmer {
            return Vec::new();
        }

        let config = self.project.config().clone();
        vec![
            BrowserTargetsValidator::new(config.clone(), self.project.root()).into(),
            LocationTypeValidator::new(config.clone(), options.force).into(),
            RootUrlValidator::new(config, ENVIRONMENT_CONFIG_PATH, options.force).into(),
        ]
    }

    fn default_output_path(&self) -> PathBuf {
        self.project
            .root()
            .join(self.build_path.trim_start_matches('/'))
    }
}

#[async_trait]
impl FrameworkAdapter for EmberFramework {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn build_command(&self) -> Option<&str> {
        self.build_command.as_deref()
    }

    fn build_path(&self) -> &str {
        &self.build_path
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn live_reload_port(&self) -> u16 {
        self.live_reload_port
    }

    fn project(&self) -> &SharedProject {
        &self.project
    }

    #[instrument(skip(self, options), fields(environment = %options.environment))]
    async fn build(&self, options: &BuildOptions) -> Result<BuildOutput> {
        let output_path = options
            .output_path
            .clone()
            .unwrap_or_else(|| self.default_output_path());

        let task = BuildTask::new(self.project.clone(), options.environment.clone(), output_path)
            .with_build_command(self.build_command.clone());
        self.tasks.build(task).await
    }

    #[instrument(skip(self, options))]
    async fn serve(&self, options: &ServeOptions) -> Result<ServeSession> {
        let task = ServeTask::new(self.project.clone(), options.ui);
        let run = ServeRunOptions {
            port: options.port.unwrap_or(self.port),
            live_reload_port: options.live_reload_port.unwrap_or(self.live_reload_port),
            base_url: "/".to_string(),
            root_url: "/".to_string(),
            project: self.project.clone(),
            environment: options.environment.clone(),
        };
        debug!(port = run.port, live_reload_port = run.live_reload_port, "serving");
        self.tasks.serve(task, run).await
    }

    fn validate_build(&self, options: &ValidateOptions) -> Result<ValidationReport> {
        self.validation.run(self.build_validators(options))
    }

    fn validate_serve(&self, options: &ValidateOptions) -> Result<ValidationReport> {
        self.validation.run(self.build_validators(options))
    }

    async fn after_install(&self) -> Result<WatchmanUpdate> {
        let task = UpdateWatchmanConfigTask::new(self.project.clone(), self.platform_dir.clone());
        self.tasks.update_watchman_config(task).await
    }
}

impl fmt::Debug for EmberFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmberFramework")
            .field("root", &self.project.root())
            .field("build_command", &self.build_command)
            .field("build_path", &self.build_path)
            .field("port", &self.port)
            .field("live_reload_port", &self.live_reload_port)
            .field("is_glimmer", &self.is_glimmer)
            .field("platform_dir", &self.platform_dir)
            .finish()
    }
}

/// Detects Ember (and Glimmer) projects
#[derive(Debug, Clone, Copy, Default)]
pub struct EmberFactory;

impl EmberFactory {
    pub fn new() -> Self {
        Self
    }

    fn is_glimmer_project(path: &Path) -> bool {
        has_npm_dependency(path, "@glimmer/application")
    }
}

impl FrameworkFactory for EmberFactory {
    fn id(&self) -> &'static str {
        EmberFramework::NAME
    }

    fn name(&self) -> &'static str {
        "Ember"
    }

    fn detect(&self, path: &Path) -> Detection {
        if has_npm_dependency(path, "ember-cli") {
            Detection::confident(95)
        } else if Self::is_glimmer_project(path) {
            Detection::confident(90)
        } else if any_file_exists(path, &["ember-cli-build.js", ".ember-cli"]) {
            Detection::confident(80)
        } else {
            Detection::No
        }
    }

    fn create(&self, mut options: FrameworkOptions) -> Box<dyn FrameworkAdapter> {
        if options.is_glimmer.is_none() {
            options.is_glimmer = Some(Self::is_glimmer_project(options.project.root()));
        }
        Box::new(EmberFramework::new(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use corber_core::StaticProject;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[derive(Debug)]
    enum Recorded {
        Build(BuildTask),
        Serve(ServeTask, ServeRunOptions),
        Watchman(UpdateWatchmanConfigTask),
    }

    #[derive(Default)]
    struct RecordingTasks {
        calls: Mutex<Vec<Recorded>>,
    }

    impl RecordingTasks {
        fn take(&self) -> Vec<Recorded> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait]
    impl TaskRunner for RecordingTasks {
        async fn build(&self, task: BuildTask) -> Result<BuildOutput> {
            let output = BuildOutput {
                output_path: task.output_path.clone(),
                environment: task.environment.clone(),
                duration_ms: 0,
            };
            self.calls.lock().unwrap().push(Recorded::Build(task));
            Ok(output)
        }

        async fn serve(&self, task: ServeTask, options: ServeRunOptions) -> Result<ServeSession> {
            let session = ServeSession::detached(&options);
            self.calls.lock().unwrap().push(Recorded::Serve(task, options));
            Ok(session)
        }

        async fn update_watchman_config(
            &self,
            task: UpdateWatchmanConfigTask,
        ) -> Result<WatchmanUpdate> {
            self.calls.lock().unwrap().push(Recorded::Watchman(task));
            Ok(WatchmanUpdate::Created)
        }
    }

    #[derive(Default)]
    struct RecordingValidation {
        runs: Mutex<Vec<Vec<ValidatorDescriptor>>>,
    }

    impl ValidationRunner for RecordingValidation {
        fn run(&self, validators: Vec<ValidatorDescriptor>) -> Result<ValidationReport> {
            let checked = validators.iter().map(|v| v.id().to_string()).collect();
            self.runs.lock().unwrap().push(validators);
            Ok(ValidationReport {
                checked,
                warnings: Vec::new(),
            })
        }
    }

    fn app_config() -> Value {
        json!({
            "modulePrefix": "my-app",
            "locationType": "hash",
            "rootURL": ""
        })
    }

    fn project() -> SharedProject {
        StaticProject::new("/apps/my-app", app_config()).shared()
    }

    struct Harness {
        adapter: EmberFramework,
        tasks: Arc<RecordingTasks>,
        validation: Arc<RecordingValidation>,
    }

    fn harness(options: FrameworkOptions) -> Harness {
        let tasks = Arc::new(RecordingTasks::default());
        let validation = Arc::new(RecordingValidation::default());
        let adapter = EmberFramework::new(options)
            .with_task_runner(tasks.clone())
            .with_validation_runner(validation.clone());
        Harness {
            adapter,
            tasks,
            validation,
        }
    }

    fn ember() -> Harness {
        harness(FrameworkOptions::new(project()))
    }

    #[test]
    fn test_defaults_are_stable() {
        let first = EmberFramework::new(FrameworkOptions::new(project()));
        let second = EmberFramework::new(FrameworkOptions::new(project()));

        for adapter in [&first, &second] {
            assert_eq!(adapter.name(), "ember");
            assert_eq!(adapter.build_path(), "/dist");
            assert_eq!(adapter.port(), 4200);
            assert_eq!(adapter.live_reload_port(), 49153);
            assert_eq!(adapter.build_command(), None);
            assert!(!adapter.is_glimmer());
        }
    }

    #[test]
    fn test_options_override_defaults() {
        let adapter = EmberFramework::new(
            FrameworkOptions::new(project())
                .with_port(4300)
                .with_build_command("yarn build:mobile"),
        );

        assert_eq!(adapter.port(), 4300);
        assert_eq!(adapter.build_command(), Some("yarn build:mobile"));
    }

    #[tokio::test]
    async fn test_build_runs_one_task_with_caller_options() {
        let h = ember();
        let options = BuildOptions::new()
            .with_environment("production")
            .with_output_path("/apps/my-app/corber/www");

        let output = h.adapter.build(&options).await.unwrap();
        assert_eq!(output.output_path, PathBuf::from("/apps/my-app/corber/www"));

        let calls = h.tasks.take();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Recorded::Build(task) => {
                assert_eq!(task.environment, "production");
                assert_eq!(task.output_path, PathBuf::from("/apps/my-app/corber/www"));
                assert!(Arc::ptr_eq(&task.project, h.adapter.project()));
                assert_eq!(task.build_command, None);
            }
            other => panic!("expected a build task, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_build_defaults_output_to_build_path() {
        let h = ember();

        h.adapter.build(&BuildOptions::new()).await.unwrap();

        match &h.tasks.take()[..] {
            [Recorded::Build(task)] => {
                assert_eq!(task.output_path, PathBuf::from("/apps/my-app/dist"));
                assert_eq!(task.environment, "development");
            }
            other => panic!("expected one build task, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_build_forwards_build_command() {
        let h = harness(FrameworkOptions::new(project()).with_build_command("make web"));

        h.adapter.build(&BuildOptions::new()).await.unwrap();

        match &h.tasks.take()[..] {
            [Recorded::Build(task)] => {
                assert_eq!(task.build_command.as_deref(), Some("make web"))
            }
            other => panic!("expected one build task, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serve_uses_requested_port() {
        let h = ember();

        let session = h.adapter.serve(&ServeOptions::new().with_port(80)).await.unwrap();
        assert_eq!(session.port, 80);
        assert_eq!(session.live_reload_port, 49153);
        assert_eq!(session.base_url, "/");
        assert_eq!(session.root_url, "/");
        assert!(Arc::ptr_eq(session.project(), h.adapter.project()));

        let calls = h.tasks.take();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Recorded::Serve(task, run) => {
                assert!(Arc::ptr_eq(&task.project, h.adapter.project()));
                assert_eq!(run.port, 80);
                assert_eq!(run.environment, "development");
            }
            other => panic!("expected a serve task, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serve_defaults_ports() {
        let h = ember();

        let session = h.adapter.serve(&ServeOptions::new()).await.unwrap();
        assert_eq!(session.port, 4200);
        assert_eq!(session.live_reload_port, 49153);
    }

    #[test]
    fn test_build_validators_order_and_config() {
        let h = ember();

        let validators = h.adapter.build_validators(&ValidateOptions::new());
        let ids: Vec<_> = validators.iter().map(|v| v.id()).collect();
        assert_eq!(ids, vec!["browser-targets", "location-type", "root-url"]);

        match &validators[..] {
            [ValidatorDescriptor::BrowserTargets(targets), ValidatorDescriptor::LocationType(location), ValidatorDescriptor::RootUrl(root_url)] =>
            {
                assert_eq!(targets.config, app_config());
                assert_eq!(targets.root, PathBuf::from("/apps/my-app"));
                assert_eq!(location.config, app_config());
                assert_eq!(location.force, None);
                assert_eq!(root_url.config, app_config());
                assert_eq!(root_url.root_props, vec!["baseURL", "rootURL", "baseUrl", "rootUrl"]);
                assert_eq!(root_url.path, "config/environment.js");
                assert_eq!(root_url.force, None);
            }
            other => panic!("unexpected validators: {:?}", other),
        }
    }

    #[test]
    fn test_build_validators_forwards_force() {
        let h = ember();

        let validators = h.adapter.build_validators(&ValidateOptions::forced());
        match &validators[..] {
            [ValidatorDescriptor::BrowserTargets(_), ValidatorDescriptor::LocationType(location), ValidatorDescriptor::RootUrl(root_url)] =>
            {
                assert_eq!(location.force, Some(true));
                assert_eq!(root_url.force, Some(true));
            }
            other => panic!("unexpected validators: {:?}", other),
        }
    }

    #[test]
    fn test_glimmer_has_no_validators() {
        let h = harness(FrameworkOptions::new(project()).with_glimmer(true));

        assert!(h.adapter.build_validators(&ValidateOptions::new()).is_empty());
        let report = h.adapter.validate_build(&ValidateOptions::new()).unwrap();
        assert!(report.checked.is_empty());
    }

    #[test]
    fn test_validate_passes_assembled_validators() {
        let h = ember();
        let options = ValidateOptions::forced();

        h.adapter.validate_build(&options).unwrap();
        h.adapter.validate_serve(&options).unwrap();

        let expected = h.adapter.build_validators(&options);
        let runs = h.validation.runs.lock().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], expected);
        assert_eq!(runs[1], expected);
    }

    #[test]
    fn test_validate_with_sequential_runner_aggregates_failures() {
        let project = StaticProject::new(
            "/apps/my-app",
            json!({ "locationType": "history", "rootURL": "/" }),
        )
        .shared();
        let adapter = EmberFramework::new(FrameworkOptions::new(project));

        let err = adapter.validate_build(&ValidateOptions::new()).unwrap_err();
        match err {
            crate::error::FrameworkError::ValidationFailed { failures } => {
                let ids: Vec<_> = failures.iter().map(|f| f.validator.as_str()).collect();
                assert_eq!(ids, vec!["location-type", "root-url"]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_after_install_runs_one_watchman_task() {
        let h = ember();

        let update = h.adapter.after_install().await.unwrap();
        assert_eq!(update, WatchmanUpdate::Created);

        match &h.tasks.take()[..] {
            [Recorded::Watchman(task)] => {
                assert_eq!(task.platform_dir, "corber");
                assert!(Arc::ptr_eq(&task.project, h.adapter.project()));
            }
            other => panic!("expected one watchman task, got {:?}", other),
        }
    }

    #[test]
    fn test_factory_detects_ember_cli() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"devDependencies": {"ember-cli": "~5.4.0"}}"#,
        )
        .unwrap();

        let detection = EmberFactory.detect(temp.path());
        assert!(detection.is_confident());
    }

    #[test]
    fn test_factory_ignores_other_projects() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}}"#,
        )
        .unwrap();

        assert!(!EmberFactory.detect(temp.path()).detected());
    }

    #[test]
    fn test_factory_sets_glimmer_from_dependencies() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("package.json"),
            r#"{"devDependencies": {"ember-cli": "*", "@glimmer/application": "^0.14.0"}}"#,
        )
        .unwrap();
        let project = StaticProject::new(temp.path(), json!({})).shared();

        let adapter = EmberFactory.create(FrameworkOptions::new(project));
        let validators = adapter.validate_build(&ValidateOptions::new()).unwrap();
        assert!(validators.checked.is_empty());
    }
}
