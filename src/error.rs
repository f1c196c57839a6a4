//! Error types for agentdocs.
//!
//! Uses thiserror for derive macros. Each variant is one failure class of the
//! resolve-render-write pass and maps to a distinct exit code.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for agentdocs operations.
#[derive(Error, Debug)]
pub enum AgentDocsError {
    /// Invalid arguments or configuration.
    #[error("{0}")]
    UserError(String),

    /// A glob pattern was malformed or matched nothing.
    #[error("Input resolution failed: {0}")]
    InputResolution(String),

    /// Frontmatter was malformed or its payload could not be decoded.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Template syntax error or an unresolved include/reference target.
    #[error("Render error: {0}")]
    Render(String),

    /// An agent formatter rejected the items it was given.
    #[error("Formatting error: {0}")]
    Formatting(String),

    /// The filesystem refused a write.
    #[error("Write error: {0}")]
    Write(String),

    /// Tasks failed during a run; each failure was already reported.
    #[error("{failed} of {total} task(s) failed")]
    TasksFailed { failed: usize, total: usize },
}

impl AgentDocsError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AgentDocsError::UserError(_) => exit_codes::USER_ERROR,
            AgentDocsError::InputResolution(_) => exit_codes::INPUT_FAILURE,
            AgentDocsError::Parse(_) => exit_codes::INPUT_FAILURE,
            AgentDocsError::Render(_) => exit_codes::RENDER_FAILURE,
            AgentDocsError::Formatting(_) => exit_codes::FORMATTING_FAILURE,
            AgentDocsError::Write(_) => exit_codes::WRITE_FAILURE,
            AgentDocsError::TasksFailed { .. } => exit_codes::TASK_FAILURE,
        }
    }

    /// Prefix the message with extra location context, keeping the variant.
    pub fn with_context(self, context: impl std::fmt::Display) -> Self {
        match self {
            AgentDocsError::UserError(m) => AgentDocsError::UserError(format!("{}: {}", context, m)),
            AgentDocsError::InputResolution(m) => {
                AgentDocsError::InputResolution(format!("{}: {}", context, m))
            }
            AgentDocsError::Parse(m) => AgentDocsError::Parse(format!("{}: {}", context, m)),
            AgentDocsError::Render(m) => AgentDocsError::Render(format!("{}: {}", context, m)),
            AgentDocsError::Formatting(m) => {
                AgentDocsError::Formatting(format!("{}: {}", context, m))
            }
            AgentDocsError::Write(m) => AgentDocsError::Write(format!("{}: {}", context, m)),
            other @ AgentDocsError::TasksFailed { .. } => other,
        }
    }
}

/// Result type alias for agentdocs operations.
pub type Result<T> = std::result::Result<T, AgentDocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = AgentDocsError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn input_errors_share_exit_code() {
        let glob = AgentDocsError::InputResolution("bad glob".to_string());
        let parse = AgentDocsError::Parse("missing delimiter".to_string());
        assert_eq!(glob.exit_code(), exit_codes::INPUT_FAILURE);
        assert_eq!(parse.exit_code(), exit_codes::INPUT_FAILURE);
    }

    #[test]
    fn render_formatting_and_write_codes() {
        assert_eq!(
            AgentDocsError::Render("x".to_string()).exit_code(),
            exit_codes::RENDER_FAILURE
        );
        assert_eq!(
            AgentDocsError::Formatting("x".to_string()).exit_code(),
            exit_codes::FORMATTING_FAILURE
        );
        assert_eq!(
            AgentDocsError::Write("x".to_string()).exit_code(),
            exit_codes::WRITE_FAILURE
        );
    }

    #[test]
    fn task_failures_have_own_code() {
        let err = AgentDocsError::TasksFailed {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.exit_code(), exit_codes::TASK_FAILURE);
        assert_eq!(err.to_string(), "1 of 3 task(s) failed");
    }

    #[test]
    fn with_context_keeps_variant() {
        let err = AgentDocsError::Parse("missing closing delimiter".to_string())
            .with_context("memories/a.md");
        assert!(matches!(err, AgentDocsError::Parse(_)));
        assert_eq!(
            err.to_string(),
            "Parse error: memories/a.md: missing closing delimiter"
        );
    }
}
