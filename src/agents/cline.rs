//! Cline.
//!
//! Rules and workflows are plain markdown without frontmatter. Project files
//! go under `.clinerules/`; user-scope files under `Documents/Cline/`.

use super::{AgentFormatter, describe_tool_invocation, join_bodies};
use crate::error::{AgentDocsError, Result};
use crate::item::Item;

#[derive(Debug, Clone, Copy, Default)]
pub struct Cline;

impl AgentFormatter for Cline {
    fn id(&self) -> &'static str {
        "cline"
    }

    fn display_name(&self) -> &'static str {
        "Cline"
    }

    fn format_memory(&self, items: &[Item]) -> Result<String> {
        Ok(join_bodies(items))
    }

    fn format_command(&self, items: &[Item]) -> Result<String> {
        if items.is_empty() {
            return Err(AgentDocsError::Formatting(
                "cline: no workflow to format".to_string(),
            ));
        }
        Ok(join_bodies(items))
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

    fn default_memory_path(&self, user_scope: bool) -> Result<String> {
        Ok(if user_scope {
            "Documents/Cline/Rules/".to_string()
        } else {
            ".clinerules/".to_string()
        })
    }

    fn default_command_path(&self, user_scope: bool) -> Result<String> {
        Ok(if user_scope {
            "Documents/Cline/Workflows/".to_string()
        } else {
            ".clinerules/workflows/".to_string()
        })
    }
}
