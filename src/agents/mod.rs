//! Per-agent formatting strategies.
//!
//! Each supported agent (Claude Code, Roo Code, Cline, GitHub Copilot) lays
//! out its memory and command files differently and reads a different
//! frontmatter schema. The pipeline only talks to the [`AgentFormatter`]
//! trait; agents are looked up by id in an [`AgentRegistry`].
//!
//! # Frontmatter sections
//!
//! Authors put agent-specific settings under a key named after the agent:
//!
//! ```yaml
//! description: Review the staged diff
//! claude:
//!   allowed-tools: Bash(git diff:*)
//! copilot:
//!   mode: agent
//! ```
//!
//! A formatter decodes only its own section; other keys are ignored.

mod claude;
mod cline;
mod copilot;
mod roo;


pub use claude::Claude;
pub use cline::Cline;
pub use copilot::Copilot;
pub use roo::Roo;

use crate::error::{AgentDocsError, Result};
use crate::item::{Item, ItemKind};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Formatting strategy for one agent.
pub trait AgentFormatter {
    /// Registry key and frontmatter section name.
    fn id(&self) -> &'static str;

    /// Human-readable agent name.
    fn display_name(&self) -> &'static str;

    /// Format memory items into one file's content.
    fn format_memory(&self, items: &[Item]) -> Result<String>;

    /// Format command items into one file's content.
    ///
    /// Agents with one command per file reject more than one item.
    fn format_command(&self, items: &[Item]) -> Result<String>;

    /// Marker pointing the agent at a file.
    fn format_file_reference(&self, path: &str) -> String;

    /// Text asking the agent to call an MCP tool.
    fn format_tool_invocation(&self, server: &str, command: &str, args: &[String]) -> String;

    /// Default memory output path, relative to the output base directory.
    /// The pipeline joins it onto `RunOptions::output_base`; a trailing `/`
    /// marks a directory whose file names come from [`Self::output_file_name`].
    fn default_memory_path(&self, user_scope: bool) -> Result<String>;

    /// Default command output path, relative to the output base directory.
    fn default_command_path(&self, user_scope: bool) -> Result<String>;

    /// File name for one input when writing into a directory.
    fn output_file_name(&self, _kind: ItemKind, base_name: &str) -> String {
        base_name.to_string()
    }

    /// Dispatch on item kind.
    fn format(&self, kind: ItemKind, items: &[Item]) -> Result<String> {
        match kind {
            ItemKind::Memory => self.format_memory(items),
            ItemKind::Command => self.format_command(items),
        }
    }

    /// Default output path for `kind`.
    fn default_path(&self, kind: ItemKind, user_scope: bool) -> Result<String> {
        match kind {
            ItemKind::Memory => self.default_memory_path(user_scope),
            ItemKind::Command => self.default_command_path(user_scope),
        }
    }
}

/// Agents keyed by id.
pub struct AgentRegistry {
    agents: BTreeMap<&'static str, Box<dyn AgentFormatter>>,
}

impl AgentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
        }
    }

    /// A registry with every built-in agent.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(Claude));
        registry.register(Box::new(Roo));
        registry.register(Box::new(Cline));
        registry.register(Box::new(Copilot));
        registry
    }

    /// Add an agent, replacing any agent with the same id.
    pub fn register(&mut self, agent: Box<dyn AgentFormatter>) {
        self.agents.insert(agent.id(), agent);
    }

    pub fn get(&self, id: &str) -> Option<&dyn AgentFormatter> {
        self.agents.get(id).map(|a| a.as_ref())
    }

    /// Look up an agent, failing with the list of known ids.
    pub fn require(&self, id: &str) -> Result<&dyn AgentFormatter> {
        self.get(id).ok_or_else(|| {
            AgentDocsError::UserError(format!(
                "unknown agent '{}'. Available agents: {}",
                id,
                self.ids().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.agents.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AgentFormatter> + '_ {
        self.agents.values().map(|a| a.as_ref())
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A frontmatter value given either as a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Entries as a list; a single string is split on commas.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            OneOrMany::Many(v) => v.clone(),
        }
    }

    /// Entries joined with `, `.
    pub fn to_joined(&self) -> String {
        match self {
            OneOrMany::One(s) => s.clone(),
            OneOrMany::Many(v) => v.join(", "),
        }
    }
}

/// Join memory bodies with a blank line, ending with a single newline.
pub(crate) fn join_bodies(items: &[Item]) -> String {
    let mut out = items
        .iter()
        .map(|i| i.content.trim_end())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Prepend a YAML frontmatter block to `body`; no block when `fields` is empty.
pub(crate) fn with_frontmatter(fields: serde_yaml::Mapping, body: &str) -> Result<String> {
    let body = body.trim_end();
    if fields.is_empty() {
        return Ok(format!("{}\n", body));
    }
    let yaml = serde_yaml::to_string(&fields).map_err(|e| {
        AgentDocsError::Formatting(format!("failed to serialize frontmatter: {}", e))
    })?;
    Ok(format!("---\n{}---\n\n{}\n", yaml, body))
}

/// Insert `key: value` when `value` is present and non-empty.
pub(crate) fn put(fields: &mut serde_yaml::Mapping, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        fields.insert(key.into(), value.into());
    }
}

/// The single command item an agent writes per file.
pub(crate) fn single_command<'a>(agent: &str, items: &'a [Item]) -> Result<&'a Item> {
    match items {
        [item] => Ok(item),
        [] => Err(AgentDocsError::Formatting(format!(
            "{}: no command to format",
            agent
        ))),
        _ => Err(AgentDocsError::Formatting(format!(
            "{} writes one command per file but got {} ({}); use a directory output path ending in '/'",
            agent,
            items.len(),
            items
                .iter()
                .map(|i| i.source_path.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Tool invocation phrasing shared by agents without a native syntax.
pub(crate) fn describe_tool_invocation(server: &str, command: &str, args: &[String]) -> String {
    let mut text = format!("use the `{}` tool from the `{}` MCP server", command, server);
    if !args.is_empty() {
        text.push_str(" with ");
        text.push_str(&args.join(" "));
    }
    text
}
