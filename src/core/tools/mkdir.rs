use serde::Deserialize;
use serde_json::{Value, json};

use super::{ToolError, parse_args, str_arg, tool_definition};
use crate::core::context::CommandContext;

#[derive(Debug, Deserialize)]
pub struct MkdirArgs {
    #[serde(default)]
    pub absolute_path: String,
}

pub struct MkdirTool;

impl super::Tool for MkdirTool {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn definition(&self) -> Value {
        tool_definition(
            self.name(),
            "Create a new directory, including missing parents. Succeeds if it already exists.",
            json!({
                "type": "object",
                "required": ["absolute_path"],
                "properties": {
                    "absolute_path": {
                        "type": "string",
                        "description": "Absolute path of the directory to create"
                    }
                }
            }),
        )
    }

    fn args_preview(&self, args: &Value) -> String {
        str_arg(args, "absolute_path")
    }

    fn execute(&self, args: &Value, _ctx: &CommandContext) -> Result<Value, ToolError> {
        let parsed: MkdirArgs = parse_args(args)?;
        let path = &parsed.absolute_path;

        let created = if path.is_empty() {
            // create_dir_all("") is a no-op success; there is nothing to create.
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            ))
        } else {
            std::fs::create_dir_all(path)
        };

        let text = match created {
            Ok(()) => format!("Directory '{}' created successfully.", path),
            Err(e) => {
                log::warn!("mkdir {} failed: {}", path, e);
                format!("Failed to create directory '{}': {}", path, e)
            }
        };
        Ok(Value::String(text))
    }
}
