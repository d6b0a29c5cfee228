//! pkgfile CLI

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pkgfile_cli::cmd;
use pkgfile_cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { package, glob } => cmd::list::list(&cli.global, &package, glob),
        Commands::Search(args) => cmd::search::search(&cli.global, &args),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(ExitCode::SUCCESS)
        }
    }
}
