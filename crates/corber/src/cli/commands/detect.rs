//! Detect command

use clap::Args;
use tracing::info;

use corber_frameworks::Orchestrator;

use super::orchestrator_settings;
use crate::cli::{output, Cli};

/// Show which framework the project uses
#[derive(Debug, Args)]
pub struct DetectCommand {}

impl DetectCommand {
    /// Execute the detect command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        info!(path = %cwd.display(), "executing detect command");

        let orchestrator = Orchestrator::with_config(orchestrator_settings(cli));
        let (_, exit_code) = orchestrator.detect_with_output(&cwd);

        if exit_code != 0 {
            if cli.is_interactive() {
                output::info("Set framework.name in corber.toml to skip detection");
            }
            std::process::exit(exit_code);
        }

        Ok(())
    }
}
