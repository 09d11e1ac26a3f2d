//! Install command - run post-install steps for the project's framework

use clap::Args;
use tracing::info;

use super::{open_or_exit, orchestrator_settings};
use crate::cli::{output, Cli};

/// Run the framework's post-install steps
#[derive(Debug, Args)]
pub struct InstallCommand {
    /// Framework environment used to load the app configuration
    #[arg(short, long, default_value = "development")]
    pub environment: String,
}

impl InstallCommand {
    /// Execute the install command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(environment = %self.environment, "executing install command");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let workspace = open_or_exit(cli, &self.environment, orchestrator_settings(cli));
        let policy = workspace.orchestrator.settings().after_install;

        let (result, exit_code) = workspace
            .orchestrator
            .install_with_output(workspace.adapter.as_ref())
            .await;

        if exit_code != 0 {
            if cli.is_interactive() {
                output::error(&format!(
                    "Post-install failed (install.after_install = \"{}\")",
                    policy.as_str()
                ));
            }
            std::process::exit(exit_code);
        }

        if cli.is_interactive() && !result.warnings.is_empty() {
            output::warning(&format!(
                "Continuing because install.after_install = \"{}\"",
                policy.as_str()
            ));
        }

        Ok(())
    }
}
