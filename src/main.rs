mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use truman_dome::ExecutionContext;

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_logging(cli.verbose);

    let cwd = match &cli.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    match cli.command {
        Commands::Execute { input } => run_execute(&input, &cwd),
        Commands::ValidatePath { path, cwd: base } => run_validate_path(&path, &base),
        Commands::Parse { input } => run_parse(&input),
    }
}

fn install_logging(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_execute(input: &str, cwd: &std::path::Path) -> Result<()> {
    let sandbox = truman_dome::config::discover(cwd)?;
    let ctx = ExecutionContext::new(sandbox);

    match truman_dome::execute(input, &ctx) {
        Ok((output, _)) => {
            print!("{output}");
            Ok(())
        }
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    }
}

fn run_validate_path(path: &str, base: &std::path::Path) -> Result<()> {
    let base = if base.is_absolute() {
        base.to_path_buf()
    } else {
        std::env::current_dir()
            .context("failed to determine current directory")?
            .join(base)
    };
    let sandbox = truman_dome::config::discover(&base)?;
    match truman_dome::validate_path(path, &sandbox, Some(&base)) {
        Ok(resolved) => {
            println!("{}", resolved.display());
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.denied_message());
            std::process::exit(1);
        }
    }
}

fn run_parse(input: &str) -> Result<()> {
    match truman_dome::parse(input) {
        Ok(node) => {
            println!("{node:#?}");
            Ok(())
        }
        Err(err) => {
            eprint!("{err}\n");
            std::process::exit(1);
        }
    }
}
