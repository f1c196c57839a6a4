//! GitHub Copilot.
//!
//! Repository instructions go to `.github/copilot-instructions.md`, or to
//! `*.instructions.md` files when written one per input. Prompt files are
//! `.github/prompts/*.prompt.md`. Copilot has no user-scope location.

use super::{AgentFormatter, OneOrMany, join_bodies, put, single_command, with_frontmatter};
use crate::error::{AgentDocsError, Result};
use crate::item::{Item, ItemKind};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default)]
pub struct Copilot;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemorySection {
    apply_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CommandSection {
    mode: Option<String>,
    description: Option<String>,
    tools: Option<OneOrMany>,
    model: Option<String>,
}

impl Copilot {
    fn no_user_scope(&self, what: &str) -> AgentDocsError {
        AgentDocsError::Formatting(format!(
            "copilot has no user-scope {} location; configure an explicit output path",
            what
        ))
    }
}

impl AgentFormatter for Copilot {
    fn id(&self) -> &'static str {
        "copilot"
    }

    fn display_name(&self) -> &'static str {
        "GitHub Copilot"
    }

    fn format_memory(&self, items: &[Item]) -> Result<String> {
        if let [item] = items
            && let Some(section) = item.section::<MemorySection>(self.id())?
        {
            let mut fields = serde_yaml::Mapping::new();
            put(&mut fields, "applyTo", section.apply_to);
            return with_frontmatter(fields, &item.content);
        }
        Ok(join_bodies(items))
    }

    fn format_command(&self, items: &[Item]) -> Result<String> {
        let item = single_command(self.id(), items)?;
        let section: CommandSection = item.section(self.id())?.unwrap_or_default();

        let mut fields = serde_yaml::Mapping::new();
        put(&mut fields, "mode", section.mode);
        put(
            &mut fields,
            "description",
            section.description.or_else(|| Some(item.description.clone())),
        );
        if let Some(tools) = section.tools {
            let list: Vec<serde_yaml::Value> =
                tools.to_list().into_iter().map(Into::into).collect();
            if !list.is_empty() {
                fields.insert("tools".into(), serde_yaml::Value::Sequence(list));
            }
        }
        put(&mut fields, "model", section.model);

        with_frontmatter(fields, &item.content)
    }

    fn format_file_reference(&self, path: &str) -> String {
        format!("#file:{}", path)
    }

    fn format_tool_invocation(&self, _server: &str, command: &str, args: &[String]) -> String {
        if args.is_empty() {
            format!("#{}", command)
        } else {
            format!("#{} {}", command, args.join(" "))
        }
    }

    fn default_memory_path(&self, user_scope: bool) -> Result<String> {
        if user_scope {
            return Err(self.no_user_scope("instructions"));
        }
        Ok(".github/copilot-instructions.md".to_string())
    }

    fn default_command_path(&self, user_scope: bool) -> Result<String> {
        if user_scope {
            return Err(self.no_user_scope("prompt"));
        }
        Ok(".github/prompts/".to_string())
    }

    fn output_file_name(&self, kind: ItemKind, base_name: &str) -> String {
        let suffix = match kind {
            ItemKind::Memory => ".instructions.md",
            ItemKind::Command => ".prompt.md",
        };
        if base_name.ends_with(suffix) {
            return base_name.to_string();
        }
        let stem = base_name.strip_suffix(".md").unwrap_or(base_name);
        format!("{}{}", stem, suffix)
    }
}
