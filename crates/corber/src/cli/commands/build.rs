//! Build command - compile the web application for the native project

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use corber_frameworks::BuildOptions;

use super::{open_or_exit, orchestrator_settings};
use crate::cli::{output, Cli};

/// Build the web application
#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Framework environment
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    /// Output directory (defaults to the framework's build path)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Report forceable configuration problems as warnings
    #[arg(long)]
    pub force: bool,

    /// Skip the configuration checks
    #[arg(long)]
    pub skip_validation: bool,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            environment = %self.environment,
            output_path = ?self.output_path,
            force = self.force,
            skip_validation = self.skip_validation,
            "executing build command"
        );
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = orchestrator_settings(cli)
            .with_force(self.force)
            .with_skip_validation(self.skip_validation);
        let workspace = open_or_exit(cli, &self.environment, settings);

        let mut options = BuildOptions::new().with_environment(&self.environment);
        if let Some(ref path) = self.output_path {
            options = options.with_output_path(path);
        }

        let spinner = output::spinner(
            cli,
            format!("Building {} ({})", workspace.adapter.name(), self.environment),
        );
        let (_, exit_code) = workspace
            .orchestrator
            .build_with_output(workspace.adapter.as_ref(), &options)
            .await;
        spinner.finish_and_clear();

        if exit_code != 0 {
            if cli.is_interactive() {
                output::error("Build failed");
            }
            std::process::exit(exit_code);
        }

        Ok(())
    }
}
