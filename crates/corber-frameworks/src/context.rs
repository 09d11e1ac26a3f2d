//! Options for framework operations
//!
//! Every field the caller may leave unset is an `Option`; adapters resolve
//! unset values against their own defaults (caller value, then config file,
//! then adapter default).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use corber_core::{Config, SharedProject};

use crate::tasks::Ui;

/// Default build/serve environment
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Construction options for a framework adapter
#[derive(Debug, Clone)]
pub struct FrameworkOptions {
    /// Project the adapter operates on
    pub project: SharedProject,

    /// Shell command replacing the native build command
    pub build_command: Option<String>,

    /// Build output directory, relative to the project root
    pub build_path: Option<String>,

    /// Development server port
    pub port: Option<u16>,

    /// Live-reload port
    pub live_reload_port: Option<u16>,

    /// Glimmer mode; `None` lets the factory decide from the project
    pub is_glimmer: Option<bool>,

    /// Directory of the native platform projects, ignored by file watchers
    pub platform_dir: Option<String>,
}

impl FrameworkOptions {
    /// Options with every default left to the adapter
    pub fn new(project: SharedProject) -> Self {
        Self {
            project,
            build_command: None,
            build_path: None,
            port: None,
            live_reload_port: None,
            is_glimmer: None,
            platform_dir: None,
        }
    }

    /// Fill unset fields from a loaded configuration file
    pub fn with_config(mut self, config: &Config) -> Self {
        let framework = &config.framework;
        self.build_command = self.build_command.or_else(|| framework.build_command.clone());
        self.build_path = self.build_path.or_else(|| framework.build_path.clone());
        self.port = self.port.or(framework.port);
        self.live_reload_port = self.live_reload_port.or(framework.live_reload_port);
        self.is_glimmer = self.is_glimmer.or(framework.glimmer);
        self.platform_dir = self
            .platform_dir
            .or_else(|| Some(config.native.platform_dir.clone()));
        self
    }

    pub fn with_glimmer(mut self, is_glimmer: bool) -> Self {
        self.is_glimmer = Some(is_glimmer);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_build_command(mut self, command: impl Into<String>) -> Self {
        self.build_command = Some(command.into());
        self
    }
}

/// Options for `build`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Framework environment (e.g. "development", "production")
    pub environment: String,

    /// Output directory; defaults to the adapter's build path
    pub output_path: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            output_path: None,
        }
    }
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }
}

/// Options for `serve`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeOptions {
    /// Requested server port; defaults to the adapter's port
    pub port: Option<u16>,

    /// Requested live-reload port; defaults to the adapter's
    pub live_reload_port: Option<u16>,

    /// Framework environment
    pub environment: String,

    /// How native tool output is surfaced
    #[serde(default)]
    pub ui: Ui,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            port: None,
            live_reload_port: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            ui: Ui::default(),
        }
    }
}

impl ServeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_live_reload_port(mut self, port: u16) -> Self {
        self.live_reload_port = Some(port);
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

/// Options for `validate_build` / `validate_serve`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateOptions {
    /// Downgrade forceable failures to warnings; forwarded verbatim
    pub force: Option<bool>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forced() -> Self {
        Self { force: Some(true) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corber_core::StaticProject;
    use serde_json::json;

    #[test]
    fn test_build_options_defaults() {
        let opts = BuildOptions::new();
        assert_eq!(opts.environment, "development");
        assert!(opts.output_path.is_none());
    }

    #[test]
    fn test_caller_values_win_over_config() {
        let project = StaticProject::new("/app", json!({})).shared();
        let mut config = Config::default();
        config.framework.port = Some(4300);
        config.framework.live_reload_port = Some(35729);
        config.framework.glimmer = Some(true);

        let opts = FrameworkOptions::new(project).with_port(8080).with_config(&config);
        assert_eq!(opts.port, Some(8080));
        assert_eq!(opts.live_reload_port, Some(35729));
        assert_eq!(opts.is_glimmer, Some(true));
        assert_eq!(opts.platform_dir.as_deref(), Some("corber"));
    }

    #[test]
    fn test_validate_options_force() {
        assert_eq!(ValidateOptions::new().force, None);
        assert_eq!(ValidateOptions::forced().force, Some(true));
    }
}
