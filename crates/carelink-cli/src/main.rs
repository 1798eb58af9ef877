use std::io;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod format;
mod util;

use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "carelink", &mut io::stdout());
        return Ok(());
    }

    // Logs go to stderr so piped JSON on stdout stays clean
    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::load();
    let output = cli.output.as_ref();

    match &cli.command {
        Commands::Transform(args) => commands::cmd_transform(args, output, &config),
        Commands::Offset { input, format } => {
            commands::cmd_offset(input, *format, output, &config)
        }
        Commands::Config { action } => commands::cmd_config(*action, cli.quiet),
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}
