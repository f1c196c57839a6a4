//! Roo Code.
//!
//! Rules are one file per input under `.roo/rules/`. Commands live under
//! `.roo/commands/` with `description` and `argument-hint` frontmatter.

use super::{
    AgentFormatter, describe_tool_invocation, join_bodies, put, single_command, with_frontmatter,
};
use crate::error::Result;
use crate::item::Item;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct Roo;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CommandSection {
    description: Option<String>,
    argument_hint: Option<String>,
}

impl AgentFormatter for Roo {
    fn id(&self) -> &'static str {
        "roo"
    }

    fn display_name(&self) -> &'static str {
        "Roo Code"
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
        put(&mut fields, "argument-hint", section.argument_hint);

        with_frontmatter(fields, &item.content)
    }

    fn format_file_reference(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("@{}", path)
        } else {
            format!("@/{}", path)
        }
    }

    fn format_tool_invocation(&self, server: &str, command: &str, args: &[String]) -> String {
        describe_tool_invocation(server, command, args)
    }

    fn default_memory_path(&self, _user_scope: bool) -> Result<String> {
        Ok(".roo/rules/".to_string())
    }

    fn default_command_path(&self, _user_scope: bool) -> Result<String> {
        Ok(".roo/commands/".to_string())
    }
}
