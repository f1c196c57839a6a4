//! Agentdocs: author agent memories and commands once, generate them for
//! every supported coding agent.
//!
//! The pipeline resolves input globs, splits frontmatter, renders bodies
//! through the template engine and hands the items to per-agent formatters.
//! The resulting files are compared with what is on disk before anything is
//! written.

pub mod agents;
pub mod cli;
pub mod commands;
pub mod config;
pub mod confirm;
pub mod error;
pub mod exit_codes;
pub mod frontmatter;
pub mod fs;
pub mod glob;
pub mod item;
pub mod logging;
pub mod pipeline;
pub mod template;
