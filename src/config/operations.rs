//! Config loading, validation, and conversion to task descriptors.

use super::model::{Config, TaskConfig};
use crate::agents::AgentRegistry;
use crate::error::{AgentDocsError, Result};
use crate::fs::clean_path;
use crate::item::ItemKind;
use crate::pipeline::{OutputTarget, TaskDescriptor};
use std::path::{Path, PathBuf};

impl Config {
    /// Load and validate config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(AgentDocsError::UserError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P, registry: &AgentRegistry) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            AgentDocsError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content, registry).map_err(|e| e.with_context(path.display()))
    }

    /// Parse and validate config from a YAML string.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn from_yaml(yaml: &str, registry: &AgentRegistry) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            AgentDocsError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate(registry)?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            AgentDocsError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - at least one memory or command task
    /// - every task has an input pattern and an output
    /// - every output names a registered agent
    /// - `max_include_depth` must be positive
    pub fn validate(&self, registry: &AgentRegistry) -> Result<()> {
        if self.max_include_depth == 0 {
            return Err(AgentDocsError::UserError(
                "config validation failed: max_include_depth must be greater than 0".to_string(),
            ));
        }

        if self.memories.is_empty() && self.commands.is_empty() {
            return Err(AgentDocsError::UserError(
                "config validation failed: no memories or commands configured".to_string(),
            ));
        }

        for (kind, index, task) in self.tasks() {
            let label = task_label(kind, index, task);
            if task.inputs.iter().all(|p| p.trim().is_empty()) {
                return Err(AgentDocsError::UserError(format!(
                    "config validation failed: {} has no inputs",
                    label
                )));
            }
            if task.outputs.is_empty() {
                return Err(AgentDocsError::UserError(format!(
                    "config validation failed: {} has no outputs",
                    label
                )));
            }
            for output in &task.outputs {
                registry
                    .require(&output.agent)
                    .map_err(|e| e.with_context(format!("config validation failed: {}", label)))?;
            }
        }

        Ok(())
    }

    /// Memory tasks then command tasks, with their kind and index.
    fn tasks(&self) -> impl Iterator<Item = (ItemKind, usize, &TaskConfig)> {
        let memories = self
            .memories
            .iter()
            .enumerate()
            .map(|(i, t)| (ItemKind::Memory, i, t));
        let commands = self
            .commands
            .iter()
            .enumerate()
            .map(|(i, t)| (ItemKind::Command, i, t));
        memories.chain(commands)
    }

    /// Base directory for outputs given the config file's directory.
    pub fn output_base(&self, config_dir: &Path) -> PathBuf {
        match self.output_dir.as_deref() {
            Some(dir) if !dir.is_empty() => clean_path(&config_dir.join(dir)),
            _ => clean_path(config_dir),
        }
    }

    /// Task descriptors rooted at `config_dir`, memories first.
    pub fn to_tasks(&self, config_dir: &Path) -> Vec<TaskDescriptor> {
        let root = clean_path(config_dir);
        self.tasks()
            .map(|(kind, index, task)| TaskDescriptor {
                kind,
                name: task_label(kind, index, task),
                root: root.clone(),
                input_patterns: task
                    .inputs
                    .iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
                outputs: task
                    .outputs
                    .iter()
                    .map(|o| OutputTarget {
                        agent: o.agent.clone(),
                        path: o.path.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

fn task_label(kind: ItemKind, index: usize, task: &TaskConfig) -> String {
    match task.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => match kind {
            ItemKind::Memory => format!("memories[{}]", index),
            ItemKind::Command => format!("commands[{}]", index),
        },
    }
}
