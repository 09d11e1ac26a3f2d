//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{
    BuildCommand, CompletionsCommand, DetectCommand, InstallCommand, ServeCommand,
    ValidateCommand,
};

/// Corber - build and serve the web layer of hybrid mobile apps
#[derive(Debug, Parser)]
#[command(name = "corber")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Forward native tool output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the web application into the native project
    Build(BuildCommand),

    /// Start the development server for live reload on devices
    Serve(ServeCommand),

    /// Check the project configuration for hybrid builds
    Validate(ValidateCommand),

    /// Run the framework's post-install steps
    Install(InstallCommand),

    /// Show which framework the project uses
    Detect(DetectCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Commands::Build(ref cmd) => cmd.execute(&self),
            Commands::Serve(ref cmd) => cmd.execute(&self),
            Commands::Validate(ref cmd) => cmd.execute(&self),
            Commands::Install(ref cmd) => cmd.execute(&self),
            Commands::Detect(ref cmd) => cmd.execute(&self),
            Commands::Completions(ref cmd) => cmd.execute(&self),
        }
    }

    /// Whether human-readable progress should be printed
    pub fn is_interactive(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["corber", "build", "--format", "json", "-q"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_serve_port_parsing() {
        let cli = Cli::try_parse_from(["corber", "serve", "--port", "80"]).unwrap();
        match cli.command {
            Commands::Serve(cmd) => assert_eq!(cmd.port, Some(80)),
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Cli::try_parse_from(["corber", "serve", "--port", "70000"]).is_err());
    }
}
