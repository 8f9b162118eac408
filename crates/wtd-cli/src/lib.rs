//! Working time compliance CLI library.
//!
//! This crate provides the CLI interface for the compliance engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{AnalyzeArgs, Cli, Commands};
pub use config::Config;
