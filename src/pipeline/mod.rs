//! Task processing: resolve inputs, parse, render, format, reconcile.
//!
//! Each task runs to completion or failure before the next one starts. A
//! failing task never stops its siblings; the run summary records every
//! task's result.
//!
//! # Output layout
//!
//! Whether a task output is one file or a directory of files is derived from
//! the effective output path alone: a trailing `/` (or `\`) means one file
//! per input, named after the input; anything else means one file holding
//! every input in resolution order.


use crate::agents::{AgentFormatter, AgentRegistry};
use crate::confirm::Confirm;
use crate::error::{AgentDocsError, Result};
use crate::fs::{FileSystem, clean_path};
use crate::item::{Item, ItemKind};
use crate::template::{DEFAULT_MAX_DEPTH, Engine};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One configured output of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Registered agent id.
    pub agent: String,
    /// Output path relative to the output base; `None` uses the agent default.
    pub path: Option<String>,
}

impl OutputTarget {
    pub fn new(agent: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// A resolved memory or command task.
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    pub kind: ItemKind,
    /// Label used in reports.
    pub name: String,
    /// Base directory for input globs and template paths.
    pub root: PathBuf,
    /// Ordered glob patterns; `!` marks an exclusion.
    pub input_patterns: Vec<String>,
    pub outputs: Vec<OutputTarget>,
}

/// Options shared by every task of a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Report decisions without writing.
    pub dry_run: bool,
    /// Overwrite modified files without asking.
    pub force: bool,
    /// Use the agents' user-scope default paths.
    pub user_scope: bool,
    /// Directory output paths are relative to.
    pub output_base: PathBuf,
    /// Include/reference nesting limit.
    pub max_depth: usize,
}

impl RunOptions {
    pub fn new(output_base: impl Into<PathBuf>) -> Self {
        Self {
            dry_run: false,
            force: false,
            user_scope: false,
            output_base: output_base.into(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// One physical file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    pub agent: String,
    /// Path relative to the output base, forward slashes.
    pub relative_path: String,
    pub content: String,
    /// Input paths the content was formatted from.
    pub sources: Vec<String>,
}

/// How a planned file compares with what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteDecision {
    Create,
    Modify,
    Unchanged,
}

impl std::fmt::Display for WriteDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteDecision::Create => write!(f, "CREATE"),
            WriteDecision::Modify => write!(f, "MODIFY"),
            WriteDecision::Unchanged => write!(f, "UNCHANGED"),
        }
    }
}

/// What was actually done with a planned file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    /// Content already matched.
    Skipped,
    /// The overwrite prompt was answered no.
    Declined,
    DryRun,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub agent: String,
    pub path: PathBuf,
    pub decision: WriteDecision,
    pub outcome: WriteOutcome,
}

/// Result of one successful task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    /// Resolved input paths in processing order.
    pub inputs: Vec<String>,
    pub files: Vec<FileReport>,
}

/// One task's name, kind and result.
#[derive(Debug)]
pub struct TaskRun {
    pub name: String,
    pub kind: ItemKind,
    pub result: Result<TaskReport>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub tasks: Vec<TaskRun>,
}

impl RunSummary {
    /// Number of failed tasks.
    pub fn failures(&self) -> usize {
        self.tasks.iter().filter(|t| t.result.is_err()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures() == 0
    }
}

/// Whether an output path names a directory.
pub fn is_directory_path(path: &str) -> bool {
    path.ends_with('/') || path.ends_with('\\')
}

/// Compare planned content against the file at `target`.
///
/// Line endings are normalized before the comparison.
pub fn decide(fs: &dyn FileSystem, target: &Path, content: &str) -> Result<WriteDecision> {
    if !fs.exists(target) {
        return Ok(WriteDecision::Create);
    }
    let existing = fs.read_to_string(target).map_err(|e| {
        AgentDocsError::Write(format!(
            "failed to read existing file '{}': {}",
            target.display(),
            e
        ))
    })?;
    if normalize_newlines(&existing) == normalize_newlines(content) {
        Ok(WriteDecision::Unchanged)
    } else {
        Ok(WriteDecision::Modify)
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Runs tasks against injected filesystem, agents and confirmation.
pub struct Pipeline<'a> {
    fs: &'a dyn FileSystem,
    registry: &'a AgentRegistry,
    confirm: &'a dyn Confirm,
    options: RunOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        registry: &'a AgentRegistry,
        confirm: &'a dyn Confirm,
        options: RunOptions,
    ) -> Self {
        Self {
            fs,
            registry,
            confirm,
            options,
        }
    }

    /// Process every task in order, isolating failures.
    pub fn run(&self, tasks: &[TaskDescriptor]) -> RunSummary {
        let mut summary = RunSummary::default();
        for task in tasks {
            info!(task = %task.name, kind = %task.kind, "processing task");
            let result = self.process_task(task);
            if let Err(err) = &result {
                warn!(task = %task.name, error = %err, "task failed");
            }
            summary.tasks.push(TaskRun {
                name: task.name.clone(),
                kind: task.kind,
                result,
            });
        }
        summary
    }

    /// Plan and reconcile one task.
    ///
    /// Every output is formatted before anything is written, so a formatting
    /// failure leaves the filesystem untouched for this task.
    pub fn process_task(&self, task: &TaskDescriptor) -> Result<TaskReport> {
        let (inputs, outputs) = self.plan(task)?;

        let mut files = Vec::with_capacity(outputs.len());
        for output in outputs {
            files.push(self.reconcile(output)?);
        }

        Ok(TaskReport { inputs, files })
    }

    /// Resolve, parse, render and format a task without touching outputs.
    pub fn plan(&self, task: &TaskDescriptor) -> Result<(Vec<String>, Vec<ResolvedOutput>)> {
        let inputs = self.resolve_inputs(task)?;
        let items = self.parse_inputs(task, &inputs)?;

        let mut outputs = Vec::new();
        for target in &task.outputs {
            let formatter = self.registry.require(&target.agent)?;
            let rendered = self.render_items(task, formatter, &items)?;
            outputs.extend(self.format_output(task.kind, formatter, target, &rendered)?);
        }
        self.check_unique_targets(&outputs)?;

        Ok((inputs, outputs))
    }

    fn target_path(&self, output: &ResolvedOutput) -> PathBuf {
        clean_path(&self.options.output_base.join(&output.relative_path))
    }

    /// Fail when two planned outputs would land on the same file.
    fn check_unique_targets(&self, outputs: &[ResolvedOutput]) -> Result<()> {
        let mut seen: BTreeMap<PathBuf, &ResolvedOutput> = BTreeMap::new();
        for output in outputs {
            let target = self.target_path(output);
            if let Some(first) = seen.get(&target) {
                return Err(AgentDocsError::Formatting(format!(
                    "'{}' is produced twice: by {} from [{}] and by {} from [{}]",
                    target.display(),
                    first.agent,
                    first.sources.join(", "),
                    output.agent,
                    output.sources.join(", ")
                )));
            }
            seen.insert(target, output);
        }
        Ok(())
    }

    fn resolve_inputs(&self, task: &TaskDescriptor) -> Result<Vec<String>> {
        let inputs = self.fs.glob(&task.input_patterns, &task.root)?;
        if inputs.is_empty() {
            return Err(AgentDocsError::InputResolution(format!(
                "no input files matched [{}] under '{}'",
                task.input_patterns.join(", "),
                task.root.display()
            )));
        }
        debug!(task = %task.name, count = inputs.len(), "resolved inputs");
        Ok(inputs)
    }

    fn parse_inputs(&self, task: &TaskDescriptor, inputs: &[String]) -> Result<Vec<Item>> {
        inputs
            .iter()
            .map(|rel| -> Result<Item> {
                let path = task.root.join(rel);
                let raw = self.fs.read_to_string(&path).map_err(|e| {
                    AgentDocsError::InputResolution(format!(
                        "failed to read '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Item::parse(task.kind, rel.as_str(), &raw)
            })
            .collect()
    }

    /// Render each item's body with a fresh engine for `formatter`.
    fn render_items(
        &self,
        task: &TaskDescriptor,
        formatter: &dyn AgentFormatter,
        items: &[Item],
    ) -> Result<Vec<Item>> {
        items
            .iter()
            .map(|item| -> Result<Item> {
                let data = item.data();
                let mut engine = Engine::new(self.fs, formatter, &task.root)
                    .with_current_file(task.root.join(&item.source_path))
                    .with_max_depth(self.options.max_depth);
                let content = engine.execute(&item.content, Some(&data))?;
                let mut rendered = item.clone();
                rendered.content = content;
                Ok(rendered)
            })
            .collect()
    }

    fn format_output(
        &self,
        kind: ItemKind,
        formatter: &dyn AgentFormatter,
        target: &OutputTarget,
        items: &[Item],
    ) -> Result<Vec<ResolvedOutput>> {
        let path = match target.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => path.to_string(),
            None => formatter.default_path(kind, self.options.user_scope)?,
        };
        let agent = formatter.id().to_string();

        if !is_directory_path(&path) {
            let content = formatter
                .format(kind, items)
                .map_err(|e| e.with_context(&agent))?;
            return Ok(vec![ResolvedOutput {
                agent,
                relative_path: path,
                content,
                sources: items.iter().map(|item| item.source_path.clone()).collect(),
            }]);
        }

        let dir = path.trim_end_matches(['/', '\\']);
        items
            .iter()
            .map(|item| -> Result<ResolvedOutput> {
                let name = formatter.output_file_name(kind, item.base_name());
                let content = formatter
                    .format(kind, std::slice::from_ref(item))
                    .map_err(|e| e.with_context(&agent))?;
                let relative_path = if dir.is_empty() {
                    name
                } else {
                    format!("{}/{}", dir, name)
                };
                Ok(ResolvedOutput {
                    agent: agent.clone(),
                    relative_path,
                    content,
                    sources: vec![item.source_path.clone()],
                })
            })
            .collect()
    }

    fn reconcile(&self, output: ResolvedOutput) -> Result<FileReport> {
        let target = self.target_path(&output);
        let decision = decide(self.fs, &target, &output.content)?;

        let outcome = if self.options.dry_run {
            WriteOutcome::DryRun
        } else if decision == WriteDecision::Unchanged {
            WriteOutcome::Skipped
        } else if decision == WriteDecision::Modify
            && !self.options.force
            && !self.confirm.confirm_overwrite(&target)?
        {
            WriteOutcome::Declined
        } else {
            self.fs
                .write(&target, output.content.as_bytes())
                .map_err(|e| {
                    AgentDocsError::Write(format!("failed to write '{}': {}", target.display(), e))
                })?;
            WriteOutcome::Written
        };

        info!(
            agent = %output.agent,
            path = %target.display(),
            decision = %decision,
            outcome = ?outcome,
            "reconciled output"
        );

        Ok(FileReport {
            agent: output.agent,
            path: target,
            decision,
            outcome,
        })
    }
}
