//! Implementation of the `agentdocs generate` command.
//!
//! 1. Loads and validates the config file
//! 2. Picks the output base: `--output-dir`, else the home directory with
//!    `--user`, else `output_dir` from the config, else the config directory
//! 3. Runs every task through the pipeline
//! 4. Prints a per-file report (or JSON) and fails if any task failed

use crate::agents::AgentRegistry;
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::confirm::{AutoConfirm, Confirm, TerminalConfirm};
use crate::error::{AgentDocsError, Result};
use crate::fs::{FileSystem, OsFileSystem};
use crate::pipeline::{Pipeline, RunOptions, RunSummary, WriteOutcome};
use crate::template::paths::display_relative;
use serde_json::{Value, json};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Execute the `agentdocs generate` command.
pub fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let confirm: Box<dyn Confirm> = if args.yes || !std::io::stdin().is_terminal() {
        Box::new(AutoConfirm(false))
    } else {
        Box::new(TerminalConfirm)
    };

    let (summary, output_base) = run_generate(&args, confirm.as_ref())?;

    if args.json {
        let value = summary_json(&summary, &output_base, args.dry_run);
        let text = serde_json::to_string_pretty(&value).map_err(|e| {
            AgentDocsError::UserError(format!("failed to serialize report: {}", e))
        })?;
        println!("{}", text);
    } else {
        print_summary(&summary, &output_base, args.dry_run);
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(AgentDocsError::TasksFailed {
            failed: summary.failures(),
            total: summary.tasks.len(),
        })
    }
}

/// Load the config and run every task. Returns the summary and the output base.
pub fn run_generate(args: &GenerateArgs, confirm: &dyn Confirm) -> Result<(RunSummary, PathBuf)> {
    let fs = OsFileSystem::new();
    let registry = AgentRegistry::builtin();
    let config = Config::load(&args.config, &registry)?;

    let parent = match args.config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let config_dir = fs.resolve_path(parent).map_err(|e| {
        AgentDocsError::UserError(format!(
            "failed to resolve config directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let output_base = output_base(args, &config, &config_dir, &fs)?;
    tracing::info!(
        config = %args.config.display(),
        output_base = %output_base.display(),
        "starting generate"
    );

    let options = RunOptions {
        dry_run: args.dry_run,
        force: args.force,
        user_scope: args.user,
        output_base: output_base.clone(),
        max_depth: config.max_include_depth,
    };
    let tasks = config.to_tasks(&config_dir);
    let summary = Pipeline::new(&fs, &registry, confirm, options).run(&tasks);

    Ok((summary, output_base))
}

fn output_base(
    args: &GenerateArgs,
    config: &Config,
    config_dir: &Path,
    fs: &OsFileSystem,
) -> Result<PathBuf> {
    if let Some(dir) = &args.output_dir {
        return fs.resolve_path(dir).map_err(|e| {
            AgentDocsError::UserError(format!(
                "failed to resolve output directory '{}': {}",
                dir.display(),
                e
            ))
        });
    }
    if args.user {
        let dirs = directories::BaseDirs::new().ok_or_else(|| {
            AgentDocsError::UserError(
                "could not determine the home directory for --user".to_string(),
            )
        })?;
        return Ok(dirs.home_dir().to_path_buf());
    }
    Ok(config.output_base(config_dir))
}

fn outcome_label(outcome: WriteOutcome) -> &'static str {
    match outcome {
        WriteOutcome::Written => "written",
        WriteOutcome::Skipped => "unchanged",
        WriteOutcome::Declined => "declined",
        WriteOutcome::DryRun => "dry run",
    }
}

fn print_summary(summary: &RunSummary, output_base: &Path, dry_run: bool) {
    let mut written = 0;
    let mut unchanged = 0;
    let mut declined = 0;

    for task in &summary.tasks {
        match &task.result {
            Ok(report) => {
                println!(
                    "{} ({}): {} input(s)",
                    task.name,
                    task.kind,
                    report.inputs.len()
                );
                for file in &report.files {
                    println!(
                        "  {:<9} {:<8} {}  ({})",
                        file.decision.to_string(),
                        file.agent,
                        display_relative(&file.path, output_base),
                        outcome_label(file.outcome)
                    );
                    match file.outcome {
                        WriteOutcome::Written => written += 1,
                        WriteOutcome::Skipped => unchanged += 1,
                        WriteOutcome::Declined => declined += 1,
                        WriteOutcome::DryRun => {}
                    }
                }
            }
            Err(err) => {
                eprintln!("{} ({}) failed: {}", task.name, task.kind, err);
            }
        }
    }

    println!();
    if dry_run {
        println!("Dry run: nothing was written.");
    } else {
        println!(
            "{} written, {} unchanged, {} declined.",
            written, unchanged, declined
        );
    }
    if declined > 0 {
        println!("Re-run with --force to overwrite declined files.");
    }
}

/// JSON form of a run summary.
pub fn summary_json(summary: &RunSummary, output_base: &Path, dry_run: bool) -> Value {
    let tasks: Vec<Value> = summary
        .tasks
        .iter()
        .map(|task| match &task.result {
            Ok(report) => json!({
                "name": task.name,
                "kind": task.kind,
                "status": "ok",
                "inputs": report.inputs,
                "files": report.files.iter().map(|f| json!({
                    "agent": f.agent,
                    "path": display_relative(&f.path, output_base),
                    "decision": f.decision,
                    "outcome": f.outcome,
                })).collect::<Vec<_>>(),
            }),
            Err(err) => json!({
                "name": task.name,
                "kind": task.kind,
                "status": "failed",
                "error": err.to_string(),
                "exit_code": err.exit_code(),
            }),
        })
        .collect();

    json!({
        "dry_run": dry_run,
        "output_base": output_base.display().to_string(),
        "failures": summary.failures(),
        "tasks": tasks,
    })
}
