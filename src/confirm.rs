//! Overwrite confirmation.
//!
//! The pipeline asks before replacing an existing file whose content would
//! change, unless `--force` is set. The prompt is behind a trait so tests
//! and non-interactive runs can answer without a terminal.

use crate::error::{AgentDocsError, Result};
use std::path::Path;

pub trait Confirm {
    /// Whether `path` may be overwritten.
    fn confirm_overwrite(&self, path: &Path) -> Result<bool>;
}

/// Interactive terminal prompt.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm_overwrite(&self, path: &Path) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(format!("Overwrite {}?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| AgentDocsError::UserError(format!("Failed to get user input: {}", e)))
    }
}

/// Fixed answer for `--yes` and for tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm_overwrite(&self, _path: &Path) -> Result<bool> {
        Ok(self.0)
    }
}
