//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Driver working time compliance checker.
///
/// Reads exported time entries and checks daily, weekly, and fortnightly
/// working and driving time against Working Time Directive limits.
#[derive(Debug, Parser)]
#[command(name = "wtd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze time entries for compliance.
    Analyze(AnalyzeArgs),

    /// Show the limits in effect.
    Limits {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// JSON array or JSON Lines file of time entries (reads stdin if omitted).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Reference date: YYYY-MM-DD, "today", "yesterday", or "N days ago".
    #[arg(short, long, default_value = "today")]
    pub date: String,

    /// Only analyze entries for this driver.
    #[arg(long)]
    pub driver: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}
