//! Execute a single command request from the host.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::config::Config;
use crate::core::context::CommandContext;
use crate::core::tools::{self, ToolError};

/// One command invocation as sent by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandRequest {
    /// Opaque correlation id, echoed back in the response.
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub context: CommandContext,
}

impl CommandRequest {
    pub fn new(command: &str, args: Value, context: CommandContext) -> Self {
        Self {
            id: Value::Null,
            command: command.to_string(),
            args,
            context,
        }
    }
}

/// Outcome of a command: `result` on success, `error` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResponse {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: String) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(error),
        }
    }
}

/// Parse one request line of the serve protocol. Lines are raw bytes so
/// invalid UTF-8 surfaces as a parse error, not an I/O error.
pub fn parse_request(line: &[u8]) -> Result<CommandRequest, serde_json::Error> {
    serde_json::from_slice(line)
}

/// Run a tool synchronously. Logs the call and, on failure, the underlying error.
pub fn execute(
    name: &str,
    args: &Value,
    ctx: &CommandContext,
    config: &Config,
) -> Result<Value, ToolError> {
    let tool = tools::find(name, config).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
    log::info!("→ {}: {}", name, tool.args_preview(args));

    let result = tool.execute(args, ctx);
    if let Err(ref e) = result {
        log::warn!("Tool {} error: {}", name, e);
    }
    result
}

/// Run a request on the blocking pool so concurrent requests do not stall the runtime.
pub async fn dispatch(request: CommandRequest, config: Arc<Config>) -> CommandResponse {
    let CommandRequest {
        id,
        command,
        args,
        context,
    } = request;
    let context = context.or_default_dir(config.current_dir.as_deref());

    let joined =
        tokio::task::spawn_blocking(move || execute(&command, &args, &context, &config)).await;

    match joined {
        Ok(Ok(value)) => CommandResponse::success(id, value),
        Ok(Err(e)) => CommandResponse::failure(id, e.to_string()),
        Err(join_err) => {
            let e = ToolError::Join(join_err.to_string());
            log::error!("{}", e);
            CommandResponse::failure(id, e.to_string())
        }
    }
}
