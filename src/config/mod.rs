//! Configuration model for agentdocs.
//!
//! This module defines the Config struct that represents `agentdocs.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for optional fields, and validation against the registered
//! agents. A validated config converts into the task descriptors the
//! pipeline consumes.

mod model;
mod operations;


pub use model::{Config, OutputConfig, TaskConfig, DEFAULT_CONFIG_FILE};
