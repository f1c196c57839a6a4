//! CLI argument parsing for agentdocs.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Agentdocs: generate agent memory and command files from one source tree.
///
/// Memories and commands are authored once as markdown with YAML
/// frontmatter, then rendered and formatted for each configured agent
/// (Claude Code, Roo Code, Cline, GitHub Copilot).
#[derive(Parser, Debug)]
#[command(name = "agentdocs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for agentdocs.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render and write every configured memory and command task.
    ///
    /// Outputs whose content already matches are skipped. Modified files
    /// prompt before being overwritten unless --force is given.
    Generate(GenerateArgs),

    /// List the registered agents and their default output paths.
    Agents(AgentsArgs),

    /// Scaffold a starter config with sample memory and command files.
    ///
    /// Existing files are never overwritten.
    Init(InitArgs),
}

/// Arguments for the `generate` command.
#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "agentdocs.yaml")]
    pub config: PathBuf,

    /// Base directory for outputs (overrides `output_dir` in the config).
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write to the user-level locations under the home directory.
    #[arg(long)]
    pub user: bool,

    /// Report what would change without writing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite modified files without prompting.
    #[arg(short, long)]
    pub force: bool,

    /// Never prompt; modified files are left alone unless --force.
    #[arg(short, long)]
    pub yes: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `agents` command.
#[derive(Parser, Debug, Default)]
pub struct AgentsArgs {
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `init` command.
#[derive(Parser, Debug, Default)]
pub struct InitArgs {
    /// Directory to scaffold into.
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
