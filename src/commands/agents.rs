//! Implementation of the `agentdocs agents` command.

use crate::agents::{AgentFormatter, AgentRegistry};
use crate::cli::AgentsArgs;
use crate::error::{AgentDocsError, Result};
use serde_json::{Value, json};

/// Execute the `agentdocs agents` command.
pub fn cmd_agents(args: AgentsArgs) -> Result<()> {
    let registry = AgentRegistry::builtin();

    if args.json {
        let text = serde_json::to_string_pretty(&agents_json(&registry)).map_err(|e| {
            AgentDocsError::UserError(format!("failed to serialize agents: {}", e))
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("Registered agents ({}):", registry.iter().count());
    for agent in registry.iter() {
        println!();
        println!("  {} ({})", agent.id(), agent.display_name());
        println!(
            "    Memory:   {}",
            paths_line(agent.default_memory_path(false), agent.default_memory_path(true))
        );
        println!(
            "    Commands: {}",
            paths_line(agent.default_command_path(false), agent.default_command_path(true))
        );
    }

    Ok(())
}

fn paths_line(project: Result<String>, user: Result<String>) -> String {
    format!(
        "{} (user: {})",
        project.unwrap_or_else(|_| "unsupported".to_string()),
        user.unwrap_or_else(|_| "unsupported".to_string())
    )
}

fn default_paths(agent: &dyn AgentFormatter, user_scope: bool) -> Value {
    json!({
        "memory": agent.default_memory_path(user_scope).ok(),
        "commands": agent.default_command_path(user_scope).ok(),
    })
}

/// JSON listing of every registered agent; unsupported paths are null.
pub fn agents_json(registry: &AgentRegistry) -> Value {
    let agents: Vec<Value> = registry
        .iter()
        .map(|agent| {
            json!({
                "id": agent.id(),
                "name": agent.display_name(),
                "project": default_paths(agent, false),
                "user": default_paths(agent, true),
            })
        })
        .collect();
    json!({ "agents": agents })
}
