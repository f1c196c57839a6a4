//! Template engine for memory and command bodies.
//!
//! Bodies are plain text with `{{ ... }}` actions. Text without actions
//! renders unchanged.
//!
//! # Syntax
//!
//! - `{{file "path"}}` - an agent-specific file reference marker
//! - `{{include "path"}}` - the rendered content of another file, inline
//! - `{{reference "path"}}` - an inline marker; the rendered content is
//!   appended under a `References` heading at the end of the document
//! - `{{mcp "server" "command" "arg"...}}` - an agent-specific MCP tool call
//! - `{{.field.sub}}` - a value from the item's frontmatter
//! - `{{if .field}}...{{else}}...{{end}}` - conditional text
//! - `{{/* comment */}}` - dropped
//! - `{{-` and `-}}` trim whitespace on that side of the action
//!
//! Included and referenced files are templates themselves and may include
//! further files. Nesting is limited by a configurable depth so that an
//! include cycle fails with an error instead of exhausting the stack.

mod parse;
pub mod paths;

#[cfg(test)]
mod tests;

use crate::agents::AgentFormatter;
use crate::error::AgentDocsError;
use crate::fs::FileSystem;
use parse::{Arg, Helper, Node};
use serde_yaml::Value;
use std::fmt;
use std::path::PathBuf;

/// Default maximum include/reference nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Error type for template failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateError {
    /// `template:line:col` of the failing action.
    pub location: String,
    /// What went wrong.
    pub cause: String,
}

impl TemplateError {
    pub fn new(location: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            cause: cause.into(),
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.cause)
    }
}

impl std::error::Error for TemplateError {}

impl From<TemplateError> for AgentDocsError {
    fn from(err: TemplateError) -> Self {
        AgentDocsError::Render(err.to_string())
    }
}

/// Render state for one top-level render pass.
///
/// Create a fresh engine per item so that references never leak between
/// documents.
pub struct Engine<'a> {
    fs: &'a dyn FileSystem,
    formatter: &'a dyn AgentFormatter,
    base_path: PathBuf,
    current_file: Option<PathBuf>,
    max_depth: usize,
    depth: usize,
    /// Reference table in first-insertion order, keyed by the path as written.
    references: Vec<(String, String)>,
}

impl<'a> Engine<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        formatter: &'a dyn AgentFormatter,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            formatter,
            base_path: base_path.into(),
            current_file: None,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            references: Vec::new(),
        }
    }

    /// Set the file whose body is being rendered.
    pub fn with_current_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_file = Some(path.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve a path argument as the helpers would right now.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        paths::resolve(path, &self.base_path, self.current_file.as_deref())
    }

    /// Render `body` and append the References section if any were collected.
    ///
    /// Any failure discards the partial output.
    pub fn execute(&mut self, body: &str, data: Option<&Value>) -> Result<String, TemplateError> {
        self.references.clear();
        let name = self.template_name();
        let rendered = self.render(&name, body, data);
        let references = std::mem::take(&mut self.references);
        let mut output = rendered?;

        if !references.is_empty() {
            output.push_str("\n\n## References\n");
            for (path, content) in references {
                output.push_str("\n### ");
                output.push_str(&path);
                output.push_str("\n\n");
                output.push_str(content.trim_end());
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn template_name(&self) -> String {
        match &self.current_file {
            Some(path) => paths::display_relative(path, &self.base_path),
            None => "<body>".to_string(),
        }
    }

    fn render(&mut self, name: &str, body: &str, data: Option<&Value>) -> Result<String, TemplateError> {
        let nodes = parse::parse(name, body)?;
        let mut out = String::with_capacity(body.len());
        self.eval_nodes(name, &nodes, data, &mut out)?;
        Ok(out)
    }

    fn eval_nodes(
        &mut self,
        name: &str,
        nodes: &[Node],
        data: Option<&Value>,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Print { arg, .. } => out.push_str(&arg_string(arg, data)),
                Node::If {
                    cond,
                    then,
                    otherwise,
                    ..
                } => {
                    let branch = if is_truthy(arg_value(cond, data).as_ref()) {
                        then
                    } else {
                        otherwise
                    };
                    self.eval_nodes(name, branch, data, out)?;
                }
                Node::Call { helper, args, pos } => {
                    let args: Vec<String> = args.iter().map(|a| arg_string(a, data)).collect();
                    let location = format!("{}:{}:{}", name, pos.line, pos.col);
                    let text = self.call(*helper, &args, data, &location)?;
                    out.push_str(&text);
                }
            }
        }
        Ok(())
    }

    fn call(
        &mut self,
        helper: Helper,
        args: &[String],
        data: Option<&Value>,
        location: &str,
    ) -> Result<String, TemplateError> {
        match helper {
            Helper::File => {
                let resolved = self.resolve_path(&args[0]);
                let shown = paths::display_relative(&resolved, &self.base_path);
                Ok(self.formatter.format_file_reference(&shown))
            }
            Helper::Include => self.render_file(&args[0], data, location),
            Helper::Reference => {
                let content = self.render_file(&args[0], data, location)?;
                let key = args[0].clone();
                match self.references.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = content,
                    None => self.references.push((key.clone(), content)),
                }
                Ok(format!("[Reference: {}]", key))
            }
            Helper::Mcp => Ok(self
                .formatter
                .format_tool_invocation(&args[0], &args[1], &args[2..])),
        }
    }

    /// Resolve, read and render a nested file with the current file switched
    /// to it for the duration of the call.
    fn render_file(
        &mut self,
        path: &str,
        data: Option<&Value>,
        location: &str,
    ) -> Result<String, TemplateError> {
        let resolved = self.resolve_path(path);

        if self.depth >= self.max_depth {
            return Err(TemplateError::new(
                location,
                format!(
                    "maximum include depth {} exceeded at \"{}\" (possible include cycle)",
                    self.max_depth, path
                ),
            ));
        }
        if !self.fs.exists(&resolved) {
            return Err(TemplateError::new(
                location,
                format!("file \"{}\" not found (resolved to {})", path, resolved.display()),
            ));
        }
        let content = self.fs.read_to_string(&resolved).map_err(|e| {
            TemplateError::new(
                location,
                format!("failed to read \"{}\" ({}): {}", path, resolved.display(), e),
            )
        })?;

        let nested_name = paths::display_relative(&resolved, &self.base_path);
        let previous = self.current_file.replace(resolved);
        self.depth += 1;
        let result = self.render(&nested_name, &content, data);
        self.depth -= 1;
        self.current_file = previous;

        result.map_err(|inner| TemplateError::new(location, format!("in \"{}\": {}", path, inner)))
    }
}

fn arg_value(arg: &Arg, data: Option<&Value>) -> Option<Value> {
    match arg {
        Arg::Str(s) => Some(Value::String(s.clone())),
        Arg::Field(path) => lookup(data?, path).cloned(),
    }
}

fn lookup<'v>(data: &'v Value, path: &[String]) -> Option<&'v Value> {
    path.iter().try_fold(data, |value, key| value.get(key.as_str()))
}

fn arg_string(arg: &Arg, data: Option<&Value>) -> String {
    match arg_value(arg, data) {
        Some(value) => value_to_string(&value),
        None => String::new(),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => value_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(value)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Sequence(s)) => !s.is_empty(),
        Some(Value::Mapping(m)) => !m.is_empty(),
        Some(Value::Tagged(tagged)) => is_truthy(Some(&tagged.value)),
    }
}
