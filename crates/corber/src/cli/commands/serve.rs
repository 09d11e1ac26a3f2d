//! Serve command - run the development server for live reload on devices

use clap::Args;
use console::style;
use tracing::{info, warn};

use corber_frameworks::{Output, ServeOptions, Ui};

use super::{open_or_exit, orchestrator_settings};
use crate::cli::{output, Cli};
use crate::exit_codes;

/// Start the development server
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Server port (defaults to the framework's port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Live-reload port (defaults to the framework's live-reload port)
    #[arg(long)]
    pub live_reload_port: Option<u16>,

    /// Framework environment
    #[arg(short, long, default_value = "development")]
    pub environment: String,

    /// Report forceable configuration problems as warnings
    #[arg(long)]
    pub force: bool,

    /// Skip the configuration checks
    #[arg(long)]
    pub skip_validation: bool,
}

impl ServeCommand {
    /// Execute the serve command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            port = ?self.port,
            live_reload_port = ?self.live_reload_port,
            environment = %self.environment,
            "executing serve command"
        );
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(self.execute_async(cli))
    }

    fn options(&self, cli: &Cli) -> ServeOptions {
        let mut options = ServeOptions::new().with_environment(&self.environment);
        if let Some(port) = self.port {
            options = options.with_port(port);
        }
        if let Some(port) = self.live_reload_port {
            options = options.with_live_reload_port(port);
        }
        if cli.verbose {
            options.ui = Ui::verbose();
        }
        options
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let settings = orchestrator_settings(cli)
            .with_force(self.force)
            .with_skip_validation(self.skip_validation);
        let workspace = open_or_exit(cli, &self.environment, settings);
        let format = output::framework_format(cli.format);

        let spinner = output::spinner(cli, "Starting development server");
        let outcome = workspace
            .orchestrator
            .serve(workspace.adapter.as_ref(), &self.options(cli))
            .await;
        spinner.finish_and_clear();

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                Output::failure("serve", e.to_string()).print(format);
                std::process::exit(e.exit_code());
            }
        };

        let mut session = result.session;
        let mut report = Output::success("serve", format!("Serving on {}", session.url()))
            .with_output("framework", &result.framework)
            .with_output("url", session.url())
            .with_output("port", session.port.to_string())
            .with_output("live_reload_port", session.live_reload_port.to_string());
        if let Some(validation) = &result.validation {
            report = report.with_issues_as_warnings(&validation.warnings);
        }
        report.print(format);

        if cli.is_interactive() {
            output::info(&format!(
                "Serving {} - press {} to stop",
                style(workspace.root.display()).cyan(),
                style("Ctrl+C").bold()
            ));
        }

        let exited = tokio::select! {
            exited = session.wait() => Some(exited),
            _ = tokio::signal::ctrl_c() => None,
        };

        match exited {
            Some(Ok(())) => Ok(()),
            Some(Err(e)) => {
                output::error(&e.to_string());
                std::process::exit(e.exit_code());
            }
            None => {
                info!("interrupted, stopping development server");
                // process::exit skips destructors, so kill the server first
                if let Err(e) = session.stop().await {
                    warn!(error = %e, "failed to stop development server");
                }
                std::process::exit(exit_codes::CANCELLED);
            }
        }
    }
}
