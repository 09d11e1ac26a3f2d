//! Orchestrator configuration
//!
//! Run-wide settings for the orchestrator: output mode, validation policy and
//! the post-install policy. CI-friendly defaults come from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use corber_core::AfterInstallPolicy;

use crate::context::ValidateOptions;
use crate::output::OutputFormat;

/// Configuration for the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Whether running in CI mode (auto-detected from CI env var)
    pub ci: bool,

    /// Output format
    pub output_format: OutputFormat,

    /// Whether to output JSON (shorthand for output_format = Json)
    pub json_output: bool,

    /// Quiet mode - suppress non-essential output
    pub quiet: bool,

    /// Verbose mode - forward native tool output
    pub verbose: bool,

    /// Skip configuration checks before build/serve
    pub skip_validation: bool,

    /// Downgrade forceable check failures to warnings
    pub force: Option<bool>,

    /// Whether a failed post-install step fails the install
    pub after_install: AfterInstallPolicy,

    /// Working directory (defaults to current dir)
    pub working_dir: Option<PathBuf>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            ci: false,
            output_format: OutputFormat::Text,
            json_output: false,
            quiet: false,
            verbose: false,
            skip_validation: false,
            force: None,
            after_install: AfterInstallPolicy::default(),
            working_dir: None,
        }
    }
}

impl OrchestratorConfig {
    /// Create a new config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config optimized for CI
    pub fn for_ci() -> Self {
        Self {
            ci: true,
            output_format: OutputFormat::Json,
            json_output: true,
            ..Default::default()
        }
    }

    /// Load config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if lookup("CI").is_some() {
            Self::for_ci()
        } else {
            Self::default()
        };

        if let Some(fmt) = lookup("CORBER_OUTPUT_FORMAT").and_then(|v| OutputFormat::parse(&v)) {
            config.output_format = fmt;
            config.json_output = fmt == OutputFormat::Json;
        }

        if lookup("CORBER_JSON").is_some() {
            config = config.with_json(true);
        }

        if lookup("CORBER_QUIET").is_some() {
            config.quiet = true;
        }

        if lookup("CORBER_VERBOSE").is_some() {
            config.verbose = true;
        }

        if lookup("CORBER_SKIP_VALIDATION").is_some_and(|v| is_truthy(&v)) {
            config.skip_validation = true;
        }

        if let Some(v) = lookup("CORBER_FORCE") {
            config.force = Some(is_truthy(&v));
        }

        if let Some(v) = lookup("CORBER_WORKING_DIR") {
            config.working_dir = Some(PathBuf::from(v));
        }

        config
    }

    // Builder methods

    pub fn with_json(mut self, json: bool) -> Self {
        self.json_output = json;
        if json {
            self.output_format = OutputFormat::Json;
        }
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    /// Force from the command line; leaves any environment value alone when unset
    pub fn with_force(mut self, force: bool) -> Self {
        if force {
            self.force = Some(true);
        }
        self
    }

    pub fn with_after_install(mut self, policy: AfterInstallPolicy) -> Self {
        self.after_install = policy;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Options for the configuration checks
    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions { force: self.force }
    }

    /// Get effective output format
    pub fn effective_output_format(&self) -> OutputFormat {
        if self.json_output {
            OutputFormat::Json
        } else {
            self.output_format
        }
    }

    /// Get working directory (current dir if not set)
    pub fn effective_working_dir(&self) -> PathBuf {
        self.working_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_vars(vars: &[(&str, &str)]) -> OrchestratorConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        OrchestratorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert!(!config.ci);
        assert!(!config.skip_validation);
        assert_eq!(config.force, None);
        assert_eq!(config.after_install, AfterInstallPolicy::Warn);
        assert_eq!(config.effective_output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_ci_defaults_to_json() {
        let config = from_vars(&[("CI", "true")]);
        assert!(config.ci);
        assert_eq!(config.effective_output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_env_overrides() {
        let config = from_vars(&[
            ("CORBER_QUIET", "1"),
            ("CORBER_SKIP_VALIDATION", "true"),
            ("CORBER_FORCE", "yes"),
            ("CORBER_OUTPUT_FORMAT", "json"),
        ]);

        assert!(config.quiet);
        assert!(config.skip_validation);
        assert_eq!(config.force, Some(true));
        assert_eq!(config.effective_output_format(), OutputFormat::Json);
        assert_eq!(config.validate_options().force, Some(true));
    }

    #[test]
    fn test_falsy_values() {
        let config = from_vars(&[("CORBER_SKIP_VALIDATION", "0"), ("CORBER_FORCE", "false")]);
        assert!(!config.skip_validation);
        assert_eq!(config.force, Some(false));
    }

    #[test]
    fn test_cli_force_keeps_env_value_when_unset() {
        let config = from_vars(&[("CORBER_FORCE", "false")]).with_force(false);
        assert_eq!(config.force, Some(false));

        let config = OrchestratorConfig::new().with_force(true);
        assert_eq!(config.force, Some(true));
    }
}
