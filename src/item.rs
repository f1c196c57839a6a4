//! Parsed memory and command items.
//!
//! An item keeps its frontmatter as an untyped YAML mapping. Agent-specific
//! sub-sections (keyed by agent id) are decoded on demand into whatever shape
//! the agent's formatter expects, so unknown keys survive untouched.

use crate::error::{AgentDocsError, Result};
use crate::frontmatter;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// The two kinds of authored input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Context/rules loaded by the agent at startup.
    Memory,
    /// A reusable prompt invoked on demand.
    Command,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Memory => write!(f, "memory"),
            ItemKind::Command => write!(f, "command"),
        }
    }
}

/// One parsed memory or command unit.
#[derive(Debug, Clone)]
pub struct Item {
    /// Whether this item came from a memory or a command task.
    pub kind: ItemKind,
    /// The full frontmatter mapping, agent sections included.
    pub raw_frontmatter: serde_yaml::Mapping,
    /// Top-level `description`, empty if absent.
    pub description: String,
    /// Body text without the frontmatter block.
    pub content: String,
    /// Path relative to the task root, forward slashes.
    pub source_path: String,
}

impl Item {
    /// Parse an item from raw file content.
    ///
    /// Command bodies have leading and trailing blank lines removed; memory
    /// bodies are kept exactly as written.
    pub fn parse(kind: ItemKind, source_path: impl Into<String>, raw: &str) -> Result<Self> {
        let source_path = source_path.into();
        let parts = frontmatter::split(raw).map_err(|e| e.with_context(&source_path))?;
        let raw_frontmatter =
            frontmatter::parse_mapping(parts.frontmatter).map_err(|e| e.with_context(&source_path))?;

        let description = raw_frontmatter
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let content = match kind {
            ItemKind::Command => trim_blank_lines(parts.body).to_string(),
            ItemKind::Memory => parts.body.to_string(),
        };

        Ok(Self {
            kind,
            raw_frontmatter,
            description,
            content,
            source_path,
        })
    }

    /// File name of the source, e.g. `review.md`.
    pub fn base_name(&self) -> &str {
        self.source_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.source_path)
    }

    /// Decode the frontmatter section named `key` into `T`.
    ///
    /// Returns `Ok(None)` when the section is absent or null.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.raw_frontmatter.get(key) {
            None | Some(serde_yaml::Value::Null) => Ok(None),
            Some(value) => serde_yaml::from_value(value.clone()).map(Some).map_err(|e| {
                AgentDocsError::Parse(format!(
                    "{}: invalid '{}' frontmatter section: {}",
                    self.source_path, key, e
                ))
            }),
        }
    }

    /// The frontmatter as a YAML value, used as template data.
    pub fn data(&self) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(self.raw_frontmatter.clone())
    }
}

/// Remove blank lines from the start of `text` and trailing whitespace from the end.
///
/// Indentation on the first non-blank line is preserved.
pub fn trim_blank_lines(text: &str) -> &str {
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    text[start..].trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    const COMMAND: &str = "---\ndescription: Review a change\nclaude:\n  allowed-tools: Bash(git diff:*)\n  model: opus\nfuture-agent:\n  anything: [1, 2]\n---\n\n\n  Review the diff.\n\nList risks.\n\n\n";

    #[derive(Debug, Deserialize)]
    struct ClaudeSection {
        #[serde(rename = "allowed-tools")]
        allowed_tools: Option<String>,
        model: Option<String>,
    }

    #[test]
    fn test_command_body_is_trimmed() {
        let item = Item::parse(ItemKind::Command, "commands/review.md", COMMAND).unwrap();
        assert_eq!(item.content, "  Review the diff.\n\nList risks.");
        assert_eq!(item.description, "Review a change");
    }

    #[test]
    fn test_memory_body_is_untouched() {
        let item = Item::parse(ItemKind::Memory, "memories/a.md", COMMAND).unwrap();
        assert_eq!(item.content, "\n\n  Review the diff.\n\nList risks.\n\n\n");
    }

    #[test]
    fn test_content_never_contains_frontmatter() {
        let item = Item::parse(ItemKind::Memory, "a.md", COMMAND).unwrap();
        assert!(!item.content.contains("description:"));
    }

    #[test]
    fn test_unknown_sections_are_preserved() {
        let item = Item::parse(ItemKind::Command, "review.md", COMMAND).unwrap();
        assert!(item.raw_frontmatter.contains_key("future-agent"));
        assert_eq!(item.raw_frontmatter.len(), 3);
    }

    #[test]
    fn test_section_decodes_typed_shape() {
        let item = Item::parse(ItemKind::Command, "review.md", COMMAND).unwrap();
        let section: ClaudeSection = item.section("claude").unwrap().unwrap();
        assert_eq!(section.allowed_tools.as_deref(), Some("Bash(git diff:*)"));
        assert_eq!(section.model.as_deref(), Some("opus"));

        let missing: Option<ClaudeSection> = item.section("roo").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_section_with_wrong_shape_fails() {
        let raw = "---\nclaude: just a string\n---\nbody";
        let item = Item::parse(ItemKind::Command, "x.md", raw).unwrap();
        let err = item.section::<ClaudeSection>("claude").unwrap_err();
        assert!(err.to_string().contains("x.md"));
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = Item::parse(ItemKind::Memory, "memories/broken.md", "---\na: 1\n").unwrap_err();
        assert!(err.to_string().contains("memories/broken.md"));
    }

    #[test]
    fn test_no_frontmatter_item() {
        let item = Item::parse(ItemKind::Memory, "plain.md", "# Plain\n").unwrap();
        assert!(item.raw_frontmatter.is_empty());
        assert_eq!(item.description, "");
        assert_eq!(item.content, "# Plain\n");
    }

    #[test]
    fn test_names() {
        let item = Item::parse(ItemKind::Command, "commands/git/commit.md", "x").unwrap();
        assert_eq!(item.base_name(), "commit.md");

        let bare = Item::parse(ItemKind::Command, "bare.md", "x").unwrap();
        assert_eq!(bare.base_name(), "bare.md");
    }

    #[test]
    fn test_trim_blank_lines() {
        assert_eq!(trim_blank_lines("\n \n\tindented\nend\n\n"), "\tindented\nend");
        assert_eq!(trim_blank_lines("\n\n"), "");
        assert_eq!(trim_blank_lines("\r\nx\r\n"), "x");
    }
}
