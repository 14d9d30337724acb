use serde::Deserialize;
use serde_json::{Value, json};
use std::process::{Command, Output};

use super::{ToolError, parse_args, str_arg, tool_definition};
use crate::core::context::CommandContext;

#[derive(Debug, Deserialize)]
pub struct ExecuteCommandArgs {
    #[serde(default)]
    pub cmd: String,
}

/// Message prefixes used when formatting a finished process.
pub(super) struct OutputLabels<'a> {
    /// Start of the message for a non-zero exit, followed by ` with error code N:`.
    pub failed: &'a str,
    /// Full first line for a successful run that wrote to stderr.
    pub with_stderr: &'a str,
}

/// Format captured process output: failure with both streams, success with
/// stderr, or plain stdout.
pub(super) fn format_output(output: &Output, labels: &OutputLabels<'_>) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return format!(
            "{} with error code {}:\nStderr:\n{}\nStdout:\n{}",
            labels.failed, code, stderr, stdout
        );
    }
    if !stderr.is_empty() {
        return format!("{}\n{}\nStdout:\n{}", labels.with_stderr, stderr, stdout);
    }
    stdout.into_owned()
}

pub struct ExecuteCommandTool;

impl super::Tool for ExecuteCommandTool {
    fn name(&self) -> &'static str {
        "execute_command"
    }

    fn definition(&self) -> Value {
        tool_definition(
            self.name(),
            "Execute a system command and return the output. Non-zero exit codes and stderr output are reported along with stdout.",
            json!({
                "type": "object",
                "required": ["cmd"],
                "properties": {
                    "cmd": {
                        "type": "string",
                        "description": "The shell command line to execute"
                    }
                }
            }),
        )
    }

    fn args_preview(&self, args: &Value) -> String {
        str_arg(args, "cmd")
    }

    fn execute(&self, args: &Value, _ctx: &CommandContext) -> Result<Value, ToolError> {
        let parsed: ExecuteCommandArgs = parse_args(args)?;

        let output = if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", &parsed.cmd]).output()
        } else {
            Command::new("sh").arg("-c").arg(&parsed.cmd).output()
        };

        let text = match output {
            Ok(output) => {
                let failed = format!("Command '{}' failed", parsed.cmd);
                format_output(
                    &output,
                    &OutputLabels {
                        failed: &failed,
                        with_stderr: "Command executed with stderr output:",
                    },
                )
            }
            Err(e) => {
                log::warn!("Cannot spawn shell for '{}': {}", parsed.cmd, e);
                format!("Command '{}' failed with error: {}", parsed.cmd, e)
            }
        };
        Ok(Value::String(text))
    }
}
