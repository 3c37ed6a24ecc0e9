//! Command line interface for secretshare_release.
//!
//! Argument parsing, the environment bootstrap and user feedback live here;
//! the publishing workflow itself is in [`crate::publish`].

mod args;
pub mod commands;
mod output;

pub use args::Args;
pub use commands::execute_command;
pub use output::OutputManager;

use crate::config::EnvConfig;
use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    let env_config = EnvConfig::from_env();
    execute_command(args, &env_config).await
}
