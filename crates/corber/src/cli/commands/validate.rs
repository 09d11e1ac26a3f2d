//! Validate command

use clap::Args;
use tracing::info;

use super::{open_or_exit, orchestrator_settings};
use crate::cli::{output, Cli};

/// Check the project configuration without building
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Run the checks that guard `serve` instead of `build`
    #[arg(long)]
    pub serve: bool,

    /// Report forceable configuration problems as warnings
    #[arg(long)]
    pub force: bool,

    /// Framework environment whose configuration is checked
    #[arg(short, long, default_value = "development")]
    pub environment: String,
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            serve = self.serve,
            force = self.force,
            environment = %self.environment,
            "executing validate command"
        );
        let settings = orchestrator_settings(cli).with_force(self.force);
        let workspace = open_or_exit(cli, &self.environment, settings);

        let (_, exit_code) = workspace
            .orchestrator
            .validate_with_output(workspace.adapter.as_ref(), self.serve);

        if exit_code != 0 {
            if cli.is_interactive() {
                output::warning("Fix the settings above or rerun with --force");
            }
            std::process::exit(exit_code);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;

    #[test]
    fn test_validate_flags() {
        let cli = Cli::try_parse_from(["corber", "validate", "--serve", "--force"]).unwrap();
        match cli.command {
            Commands::Validate(cmd) => {
                assert!(cmd.serve);
                assert!(cmd.force);
                assert_eq!(cmd.environment, "development");
            }
            other => panic!("expected validate, got {:?}", other),
        }
    }
}
