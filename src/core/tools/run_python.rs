//! RunPython tool: execute inline Python code through a temporary script.
//!
//! The script is removed once the interpreter exits, whether it succeeded,
//! failed or could not be started.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde::Deserialize;
use serde_json::{Value, json};

use super::bash::{OutputLabels, format_output};
use super::{ToolError, parse_args, str_arg, tool_definition};
use crate::core::config::Config;
use crate::core::context::CommandContext;

#[derive(Debug, Deserialize)]
pub struct RunPythonArgs {
    #[serde(default)]
    pub text: String,
}

/// Returns true if an executable file with this name is found on `PATH`.
fn on_path(bin: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(bin).is_file()))
        .unwrap_or(false)
}

pub struct RunPythonTool {
    interpreter: Option<String>,
    tmp_dir: PathBuf,
}

impl RunPythonTool {
    pub fn new(config: &Config) -> Self {
        Self {
            interpreter: config.python.clone(),
            tmp_dir: config.tmp_dir(),
        }
    }

    /// Configured interpreter, else `python` if installed, else `python3`.
    fn interpreter(&self) -> String {
        if let Some(ref bin) = self.interpreter {
            return bin.clone();
        }
        let bin = if on_path("python") { "python" } else { "python3" };
        bin.to_string()
    }

    fn run(&self, text: &str) -> std::io::Result<Output> {
        let mut file = tempfile::Builder::new()
            .prefix("ah_shell_")
            .suffix(".py")
            .tempfile_in(&self.tmp_dir)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        // Close the handle but keep the path alive until the script has run.
        let script = file.into_temp_path();
        let interpreter = self.interpreter();
        log::debug!("Running {} {}", interpreter, script.display());
        let output = Command::new(&interpreter).arg(&*script).output();

        if let Err(e) = script.close() {
            log::warn!("Cannot remove temporary script: {}", e);
        }
        output
    }
}

impl super::Tool for RunPythonTool {
    fn name(&self) -> &'static str {
        "run_python"
    }

    fn definition(&self) -> Value {
        tool_definition(
            self.name(),
            "Execute Python code by writing it to a temporary file and running it. The code runs in the current process working directory; the temporary file is deleted afterwards.",
            json!({
                "type": "object",
                "required": ["text"],
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Python source code to execute"
                    }
                }
            }),
        )
    }

    fn args_preview(&self, args: &Value) -> String {
        let text = str_arg(args, "text");
        let first = text.lines().next().unwrap_or("");
        if text.lines().nth(1).is_some() {
            format!("{} …", first)
        } else {
            first.to_string()
        }
    }

    fn execute(&self, args: &Value, _ctx: &CommandContext) -> Result<Value, ToolError> {
        let parsed: RunPythonArgs = parse_args(args)?;

        let text = match self.run(&parsed.text) {
            Ok(output) => format_output(
                &output,
                &OutputLabels {
                    failed: "Python code execution failed",
                    with_stderr: "Python code executed with stderr output:",
                },
            ),
            Err(e) => {
                log::warn!("run_python failed: {}", e);
                format!("Failed to execute Python code: {}", e)
            }
        };
        Ok(Value::String(text))
    }
}
