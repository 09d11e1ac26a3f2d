//! Configuration types

use serde::{Deserialize, Serialize};

use super::defaults::DEFAULT_PLATFORM_DIR;

/// Main configuration for Corber
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Framework overrides, merged over the adapter's defaults
    pub framework: FrameworkConfig,

    /// Native packaging layout
    pub native: NativeConfig,

    /// Install-time behaviour
    pub install: InstallConfig,
}

/// Framework overrides
///
/// Every field is optional; an unset field leaves the adapter default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Adapter name to use instead of auto-detection (e.g. "ember")
    pub name: Option<String>,

    /// Shell command replacing the framework's native build command
    pub build_command: Option<String>,

    /// Build output directory, relative to the project root
    pub build_path: Option<String>,

    /// Development server port
    pub port: Option<u16>,

    /// Live-reload port
    pub live_reload_port: Option<u16>,

    /// Treat the project as a Glimmer application
    pub glimmer: Option<bool>,
}

/// Native packaging layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    /// Directory holding the native platform projects
    pub platform_dir: String,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            platform_dir: DEFAULT_PLATFORM_DIR.to_string(),
        }
    }
}

/// Install-time behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// What to do when the post-install step fails
    pub after_install: AfterInstallPolicy,
}

/// Policy applied when a framework's post-install step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterInstallPolicy {
    /// Report the failure and carry on
    #[default]
    Warn,
    /// Abort the install
    Fail,
}

impl AfterInstallPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fail)
    }
}
