//! CLI commands

mod build;
mod completions;
mod detect;
mod install;
mod serve;
mod validate;

pub use build::BuildCommand;
pub use completions::CompletionsCommand;
pub use detect::DetectCommand;
pub use install::InstallCommand;
pub use serve::ServeCommand;
pub use validate::ValidateCommand;

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use corber_core::config::load_config_or_default;
use corber_core::EmberProject;
use corber_frameworks::{FrameworkAdapter, Orchestrator, OrchestratorConfig};

use super::output;
use super::{Cli, OutputFormat};
use crate::exit_codes;

/// Everything a command needs to talk to the project's framework
pub struct Workspace {
    pub root: PathBuf,
    pub orchestrator: Orchestrator,
    pub adapter: Box<dyn FrameworkAdapter>,
}

impl Workspace {
    /// Load the configuration file, evaluate the app config and pick the adapter.
    ///
    /// The project root is the directory holding `corber.toml`/`corber.yaml`,
    /// or the working directory (`CORBER_WORKING_DIR`, else the current
    /// directory) when there is none.
    pub fn open(
        cli: &Cli,
        environment: &str,
        settings: OrchestratorConfig,
    ) -> anyhow::Result<Self> {
        let cwd = settings.effective_working_dir();
        let (config, config_path) = load_config_or_default(&cwd)?;

        let root = config_path
            .as_deref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or(cwd);
        debug!(root = %root.display(), config = ?config_path, "opening project");

        let settings = settings.with_after_install(config.install.after_install);
        let orchestrator = Orchestrator::with_config(settings);

        let project = EmberProject::open(&root, environment)
            .with_context(|| {
                format!("Failed to load the app configuration in {}", root.display())
            })?
            .shared();
        let adapter = orchestrator.select(project, &config)?;

        if cli.is_interactive() {
            output::info(&format!("Using {} at {}", adapter.name(), root.display()));
        }

        Ok(Self {
            root,
            orchestrator,
            adapter,
        })
    }
}

/// Orchestrator settings: environment variables, then global flags
pub fn orchestrator_settings(cli: &Cli) -> OrchestratorConfig {
    let mut settings = OrchestratorConfig::from_env();
    if cli.quiet {
        settings = settings.with_quiet(true);
    }
    if cli.verbose {
        settings = settings.with_verbose(true);
    }
    if cli.format == OutputFormat::Json {
        settings = settings.with_json(true);
    }
    // `-C` has already moved the process there
    if cli.directory.is_some() {
        if let Ok(cwd) = std::env::current_dir() {
            settings = settings.with_working_dir(cwd);
        }
    }
    settings
}

/// Open the workspace, or report why not and exit
pub fn open_or_exit(cli: &Cli, environment: &str, settings: OrchestratorConfig) -> Workspace {
    match Workspace::open(cli, environment, settings) {
        Ok(workspace) => workspace,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                let failure = corber_frameworks::Output::failure("load", format!("{:#}", e));
                failure.print(output::framework_format(cli.format));
            } else {
                output::error(&format!("{:#}", e));
            }
            std::process::exit(exit_code_for(&e));
        }
    }
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<corber_frameworks::FrameworkError>() {
        return e.exit_code();
    }
    if error.downcast_ref::<corber_core::CorberError>().is_some() {
        return exit_codes::CONFIG_ERROR;
    }
    exit_codes::ERROR
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_json_flag_enables_json_output() {
        let cli = Cli::try_parse_from(["corber", "--format", "json", "detect"]).unwrap();
        let settings = orchestrator_settings(&cli);
        assert!(settings.json_output);
    }

    #[test]
    fn test_exit_code_for_framework_errors() {
        let error = anyhow::Error::new(corber_frameworks::FrameworkError::UnknownFramework {
            name: "vue".to_string(),
            supported: "ember".to_string(),
        });
        assert_eq!(exit_code_for(&error), 2);
    }

    #[test]
    fn test_exit_code_for_config_errors() {
        let error = anyhow::Error::new(corber_core::CorberError::other("bad config"));
        assert_eq!(exit_code_for(&error), exit_codes::CONFIG_ERROR);

        let error = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&error), exit_codes::ERROR);
    }
}
