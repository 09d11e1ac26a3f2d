//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_framework(config)?;
    validate_native(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_framework(config: &Config) -> Result<()> {
    let framework = &config.framework;

    if framework.port == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: "framework.port".to_string(),
            message: "port must be greater than 0".to_string(),
        }
        .into());
    }

    if framework.live_reload_port == Some(0) {
        return Err(ConfigError::InvalidValue {
            field: "framework.live_reload_port".to_string(),
            message: "port must be greater than 0".to_string(),
        }
        .into());
    }

    if let (Some(port), Some(live_reload)) = (framework.port, framework.live_reload_port) {
        if port == live_reload {
            return Err(ConfigError::InvalidValue {
                field: "framework.live_reload_port".to_string(),
                message: format!("must differ from framework.port ({})", port),
            }
            .into());
        }
    }

    if let Some(build_path) = &framework.build_path {
        if build_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "framework.build_path".to_string(),
                message: "build path cannot be empty".to_string(),
            }
            .into());
        }
    }

    if let Some(command) = &framework.build_command {
        if command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "framework.build_command".to_string(),
                message: "build command cannot be empty; remove it to use the default".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_native(config: &Config) -> Result<()> {
    if config.native.platform_dir.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "native.platform_dir".to_string(),
            message: "platform directory cannot be empty".to_string(),
        }
        .into());
    }

    Ok(())
}
