//! Config struct definition and default implementation.

use crate::template::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// File name looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "agentdocs.yaml";

/// Configuration for one agentdocs project.
///
/// Paths are relative to the directory containing the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base directory for task outputs (default: the config directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    /// Maximum include/reference nesting depth.
    #[serde(default = "default_max_include_depth")]
    pub max_include_depth: usize,

    /// Memory tasks, processed before command tasks.
    pub memories: Vec<TaskConfig>,

    /// Command tasks.
    pub commands: Vec<TaskConfig>,
}

/// One memory or command task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Label for reports; defaults to `memories[<index>]` or `commands[<index>]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Ordered glob patterns; a leading `!` excludes.
    #[serde(default)]
    pub inputs: Vec<String>,

    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

/// One output of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Registered agent id.
    pub agent: String,

    /// Override of the agent's default path; a trailing `/` writes one file
    /// per input into that directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_max_include_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: None,
            max_include_depth: default_max_include_depth(),
            memories: Vec::new(),
            commands: Vec::new(),
        }
    }
}
