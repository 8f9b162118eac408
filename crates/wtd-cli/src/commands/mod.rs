//! CLI subcommand implementations.

pub mod analyze;
pub mod limits;
pub mod util;
