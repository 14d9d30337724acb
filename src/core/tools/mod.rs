mod bash;
mod exclude;
mod mkdir;
mod run_python;
mod tree;

use std::path::PathBuf;

use serde_json::{Value, json};
use thiserror::Error;

use crate::core::config::Config;
use crate::core::context::CommandContext;

pub use bash::ExecuteCommandTool;
pub use mkdir::MkdirTool;
pub use run_python::RunPythonTool;
pub use tree::TreeTool;

/// Errors returned by tool handlers.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(#[source] serde_json::Error),

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid ignore file: {0}")]
    Ignore(#[from] ignore::Error),

    #[error("Cannot serialize result: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("unknown command '{0}'")]
    UnknownTool(String),

    #[error("Command task failed: {0}")]
    Join(String),
}

/// Helper to extract a string argument from tool args JSON.
pub fn str_arg(args: &Value, key: &str) -> String {
    args.get(key).and_then(|v| v.as_str()).unwrap_or("").to_string()
}

/// Helper to build the standard tool definition structure for the API.
pub fn tool_definition(name: &str, description: &str, parameters: Value) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": name,
            "description": description,
            "parameters": parameters
        }
    })
}

/// Deserialize tool args; a missing or null args object counts as `{}`.
fn parse_args<T: serde::de::DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    let args = if args.is_null() { json!({}) } else { args.clone() };
    serde_json::from_value(args).map_err(ToolError::InvalidArgs)
}

/// Trait for plugin commands. Each tool provides its API definition and executes with JSON arguments.
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn definition(&self) -> Value;
    fn args_preview(&self, args: &Value) -> String;
    fn execute(&self, args: &Value, ctx: &CommandContext) -> Result<Value, ToolError>;
}

/// All registered tools.
pub fn all(config: &Config) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(ExecuteCommandTool),
        Box::new(MkdirTool),
        Box::new(RunPythonTool::new(config)),
        Box::new(TreeTool),
    ]
}

/// Look up a registered tool by command name.
pub fn find(name: &str, config: &Config) -> Option<Box<dyn Tool>> {
    all(config).into_iter().find(|t| t.name() == name)
}

/// Tool definitions for the host (order matches `all()`).
pub fn definitions(config: &Config) -> Vec<Value> {
    all(config).iter().map(|t| t.definition()).collect()
}
