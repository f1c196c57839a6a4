//! Frontmatter splitting for memory and command files.
//!
//! Files may begin with a YAML block delimited by `---` lines:
//!
//! ```text
//! ---
//! description: Review a pull request
//! claude:
//!   allowed-tools: Bash(git diff:*)
//! ---
//! Review the diff and summarize the risks.
//! ```
//!
//! A file that does not open with the delimiter has no frontmatter. A file
//! that opens one but never closes it is rejected.

use crate::error::{AgentDocsError, Result};

const DELIMITER: &str = "---";

/// A file split into its frontmatter payload and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Text strictly between the two delimiter lines (empty if absent).
    pub frontmatter: &'a str,
    /// Everything after the closing delimiter line, untrimmed.
    pub body: &'a str,
}

/// Split raw file content into frontmatter and body.
///
/// Both LF and CRLF line endings are accepted for the delimiter lines. The
/// body is returned exactly as written.
///
/// # Examples
///
/// ```
/// use agentdocs::frontmatter::split;
///
/// let parts = split("---\ntitle: x\n---\nbody\n").unwrap();
/// assert_eq!(parts.frontmatter, "title: x\n");
/// assert_eq!(parts.body, "body\n");
///
/// let plain = split("no frontmatter here").unwrap();
/// assert_eq!(plain.frontmatter, "");
/// assert_eq!(plain.body, "no frontmatter here");
/// ```
pub fn split(content: &str) -> Result<Split<'_>> {
    let Some(after_open) = strip_opening(content) else {
        return Ok(Split {
            frontmatter: "",
            body: content,
        });
    };

    let payload_start = content.len() - after_open.len();
    let mut line_start = payload_start;

    while line_start <= content.len() {
        let rest = &content[line_start..];
        let (line, next_start) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], line_start + idx + 1),
            None => (rest, content.len() + 1),
        };

        if line.strip_suffix('\r').unwrap_or(line) == DELIMITER {
            let body_start = next_start.min(content.len());
            return Ok(Split {
                frontmatter: &content[payload_start..line_start],
                body: &content[body_start..],
            });
        }

        line_start = next_start;
    }

    Err(AgentDocsError::Parse(
        "malformed frontmatter: missing closing delimiter".to_string(),
    ))
}

/// Return the content after an opening `---` line, if it has one.
fn strip_opening(content: &str) -> Option<&str> {
    let rest = content.strip_prefix(DELIMITER)?;
    rest.strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
}

/// Parse a frontmatter payload into a YAML mapping.
///
/// An empty or whitespace-only payload yields an empty mapping. A payload that
/// is valid YAML but not a mapping (e.g. a bare list) is rejected.
pub fn parse_mapping(payload: &str) -> Result<serde_yaml::Mapping> {
    if payload.trim().is_empty() {
        return Ok(serde_yaml::Mapping::new());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(payload)
        .map_err(|e| AgentDocsError::Parse(format!("invalid frontmatter YAML: {}", e)))?;

    match value {
        serde_yaml::Value::Mapping(map) => Ok(map),
        serde_yaml::Value::Null => Ok(serde_yaml::Mapping::new()),
        _ => Err(AgentDocsError::Parse(
            "invalid frontmatter YAML: expected a mapping at the top level".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frontmatter_returns_full_body() {
        let body = "# Title\n\nSome text.\n";
        let parts = split(body).unwrap();
        assert_eq!(parts.frontmatter, "");
        assert_eq!(parts.body, body);
    }

    #[test]
    fn test_dashes_without_line_break_are_body() {
        let body = "----\nnot frontmatter\n";
        let parts = split(body).unwrap();
        assert_eq!(parts.frontmatter, "");
        assert_eq!(parts.body, body);

        let parts = split("---").unwrap();
        assert_eq!(parts.body, "---");
    }

    #[test]
    fn test_empty_content() {
        let parts = split("").unwrap();
        assert_eq!(parts.frontmatter, "");
        assert_eq!(parts.body, "");
    }

    #[test]
    fn test_basic_split_preserves_body() {
        let parts = split("---\na: 1\nb: two\n---\n\n  body line\n\n").unwrap();
        assert_eq!(parts.frontmatter, "a: 1\nb: two\n");
        assert_eq!(parts.body, "\n  body line\n\n");
    }

    #[test]
    fn test_crlf_delimiters() {
        let parts = split("---\r\na: 1\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(parts.frontmatter, "a: 1\r\n");
        assert_eq!(parts.body, "body\r\n");
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let parts = split("---\n---\nbody").unwrap();
        assert_eq!(parts.frontmatter, "");
        assert_eq!(parts.body, "body");
    }

    #[test]
    fn test_closing_delimiter_at_end_of_file() {
        let parts = split("---\na: 1\n---").unwrap();
        assert_eq!(parts.frontmatter, "a: 1\n");
        assert_eq!(parts.body, "");
    }

    #[test]
    fn test_indented_or_longer_dashes_do_not_close() {
        let err = split("---\na: 1\n ---\n----\nbody\n").unwrap_err();
        assert!(matches!(err, AgentDocsError::Parse(_)));
    }

    #[test]
    fn test_missing_closing_delimiter_fails() {
        let err = split("---\ntitle: x\nbody without end\n").unwrap_err();
        assert!(err.to_string().contains("missing closing delimiter"));

        assert!(split("---\n").is_err());
    }

    #[test]
    fn test_later_delimiters_stay_in_body() {
        let parts = split("---\na: 1\n---\nintro\n---\nmore\n").unwrap();
        assert_eq!(parts.frontmatter, "a: 1\n");
        assert_eq!(parts.body, "intro\n---\nmore\n");
    }

    #[test]
    fn test_parse_mapping() {
        let map = parse_mapping("description: hi\nclaude:\n  model: opus\n").unwrap();
        assert_eq!(
            map.get("description").and_then(|v| v.as_str()),
            Some("hi")
        );
        assert!(map.get("claude").unwrap().is_mapping());
    }

    #[test]
    fn test_parse_mapping_empty_and_invalid() {
        assert!(parse_mapping("").unwrap().is_empty());
        assert!(parse_mapping("   \n").unwrap().is_empty());
        assert!(parse_mapping("- a\n- b\n").is_err());
        assert!(parse_mapping("a: [unclosed\n").is_err());
    }
}
