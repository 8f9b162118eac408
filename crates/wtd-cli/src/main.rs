use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wtd_cli::commands::{analyze, limits};
use wtd_cli::{Cli, Commands, Config};

/// Load config and check that its limits are usable.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    config
        .limits
        .validate()
        .context("invalid limits in configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so JSON output on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Analyze(args)) => {
            let config = load_config(cli.config.as_deref())?;
            analyze::run(&mut stdout, args, &config)?;
        }
        Some(Commands::Limits { json }) => {
            let config = load_config(cli.config.as_deref())?;
            limits::run(&mut stdout, &config.limits, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
