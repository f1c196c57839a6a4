//! Claude Code.
//!
//! Memory goes to `CLAUDE.md`; commands are one markdown file each under
//! `.claude/commands/`, with frontmatter from the item's `claude` section.

use super::{AgentFormatter, OneOrMany, join_bodies, put, single_command, with_frontmatter};
use crate::error::Result;
use crate::item::Item;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct Claude;

/// The `claude:` frontmatter section of a command.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CommandSection {
    description: Option<String>,
    allowed_tools: Option<OneOrMany>,
    argument_hint: Option<String>,
    model: Option<String>,
}

impl AgentFormatter for Claude {
    fn id(&self) -> &'static str {
        "claude"
    }

    fn display_name(&self) -> &'static str {
        "Claude Code"
    }

    fn format_memory(&self, items: &[Item]) -> Result<String> {
        Ok(join_bodies(items))
    }

    fn format_command(&self, items: &[Item]) -> Result<String> {
        let item = single_command(self.id(), items)?;
        let section: CommandSection = item.section(self.id())?.unwrap_or_default();

        let mut fields = serde_yaml::Mapping::new();
        put(
            &mut fields,
            "description",
            section.description.or_else(|| Some(item.description.clone())),
        );
        put(
            &mut fields,
            "allowed-tools",
            section.allowed_tools.map(|t| t.to_joined()),
        );
        put(&mut fields, "argument-hint", section.argument_hint);
        put(&mut fields, "model", section.model);

        with_frontmatter(fields, &item.content)
    }

    fn format_file_reference(&self, path: &str) -> String {
        format!("@{}", path)
    }

    fn format_tool_invocation(&self, server: &str, command: &str, args: &[String]) -> String {
        let name = format!("mcp__{}__{}", server, command);
        if args.is_empty() {
            name
        } else {
            format!("{} {}", name, args.join(" "))
        }
    }

    fn default_memory_path(&self, user_scope: bool) -> Result<String> {
        Ok(if user_scope {
            ".claude/CLAUDE.md".to_string()
        } else {
            "CLAUDE.md".to_string()
        })
    }

    fn default_command_path(&self, _user_scope: bool) -> Result<String> {
        Ok(".claude/commands/".to_string())
    }
}
