//! Shell completions generation command

use std::io;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::Cli;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();

        match self.output {
            Some(ref path) => {
                let mut file = std::fs::File::create(path)?;
                generate(self.shell, &mut cmd, name, &mut file);
                if !cli.quiet {
                    eprintln!("Completions written to {}", path.display());
                }
            }
            None => generate(self.shell, &mut cmd, name, &mut io::stdout()),
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
    fn test_shell_argument() {
        let cli = Cli::try_parse_from(["corber", "completions", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(cmd) => assert_eq!(cmd.shell, Shell::Zsh),
            other => panic!("expected completions, got {:?}", other),
        }
    }

    #[test]
    fn test_generates_script_for_binary_name() {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        generate(Shell::Bash, &mut cmd, "corber", &mut buf);

        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("corber"));
        assert!(script.contains("serve"));
    }
}
