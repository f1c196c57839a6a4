//! Command implementations for agentdocs.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Handlers print reports to stdout; diagnostics go
//! through `tracing` to stderr.

mod agents;
mod generate;
mod init;

pub use agents::{agents_json, cmd_agents};
pub use generate::{cmd_generate, run_generate, summary_json};
pub use init::{cmd_init, scaffold};

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => cmd_generate(args),
        Command::Agents(args) => cmd_agents(args),
        Command::Init(args) => cmd_init(args),
    }
}
