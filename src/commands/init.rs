//! Implementation of the `agentdocs init` command.
//!
//! Writes a starter `agentdocs.yaml` plus one sample memory and one sample
//! command. The command is idempotent: files that already exist are left
//! untouched and reported as skipped.

use crate::cli::InitArgs;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::{AgentDocsError, Result};
use crate::fs::atomic_write;
use std::path::{Path, PathBuf};

const STARTER_CONFIG: &str = r#"# agentdocs configuration. Paths are relative to this file.
memories:
  - name: project
    inputs: ["memories/**/*.md"]
    outputs:
      - agent: claude
      - agent: copilot
commands:
  - name: commands
    inputs: ["commands/*.md"]
    outputs:
      - agent: claude
      - agent: roo
"#;

const SAMPLE_MEMORY: &str = r#"---
description: Project conventions
---

# Project conventions

- Start with the overview in {{file "README.md"}}.
- Keep changes small and covered by tests.
"#;

const SAMPLE_COMMAND: &str = r#"---
description: Review the staged changes
claude:
  allowed-tools: Bash(git diff:*), Read
  argument-hint: "[focus]"
roo:
  argument-hint: "<focus>"
---

Review the staged changes with `git diff --cached` and list the risks you see.
"#;

/// Files written by `init`, relative to the target directory.
const STARTER_FILES: &[(&str, &str)] = &[
    (DEFAULT_CONFIG_FILE, STARTER_CONFIG),
    ("memories/project.md", SAMPLE_MEMORY),
    ("commands/review.md", SAMPLE_COMMAND),
];

/// Execute the `agentdocs init` command.
pub fn cmd_init(args: InitArgs) -> Result<()> {
    let results = scaffold(&args.dir)?;

    println!("Initialized agentdocs in {}.", args.dir.display());
    println!();
    for (path, created) in &results {
        let status = if *created { "created" } else { "exists, skipped" };
        println!("  {}  ({})", path.display(), status);
    }
    println!();
    println!("Next: edit the files, then run `agentdocs generate --dry-run`.");

    Ok(())
}

/// Write missing starter files under `dir`.
///
/// Returns each starter path with whether it was created.
pub fn scaffold(dir: &Path) -> Result<Vec<(PathBuf, bool)>> {
    let mut results = Vec::with_capacity(STARTER_FILES.len());

    for (relative, content) in STARTER_FILES {
        let path = dir.join(relative);
        if path.exists() {
            results.push((path, false));
            continue;
        }
        atomic_write(&path, content.as_bytes()).map_err(|e| {
            AgentDocsError::Write(format!("failed to write '{}': {}", path.display(), e))
        })?;
        results.push((path, true));
    }

    Ok(results)
}
