use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "truman",
    version,
    about = "A sandboxed, bash-compatible command pipeline for agents"
)]
pub struct Cli {
    /// Directory to treat as the session's starting working directory.
    #[arg(short = 'd', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase log verbosity; repeat for more (-v, -vv, -vvv).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Runs a command line through the full pipeline and prints its output.
    Execute { input: String },
    /// Resolves a path against the dome and prints the canonical result.
    ValidatePath { path: String, cwd: PathBuf },
    /// Parses a command line and prints its command tree.
    Parse { input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_execute_subcommand() {
        let cli = Cli::parse_from(["truman", "execute", "echo hi"]);
        match cli.command {
            Commands::Execute { input } => assert_eq!(input, "echo hi"),
            other => panic!("expected Execute, got {other:?}"),
        }
    }

    #[test]
    fn parses_validate_path_subcommand() {
        let cli = Cli::parse_from(["truman", "validate-path", "a/b", "/dome"]);
        match cli.command {
            Commands::ValidatePath { path, cwd } => {
                assert_eq!(path, "a/b");
                assert_eq!(cwd, PathBuf::from("/dome"));
            }
            other => panic!("expected ValidatePath, got {other:?}"),
        }
    }

    #[test]
    fn verbose_flag_counts_repetitions() {
        let cli = Cli::parse_from(["truman", "-vv", "parse", "ls"]);
        assert_eq!(cli.verbose, 2);
    }
}
