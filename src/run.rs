//! Application run modes: logger init, one-shot commands, serve loop.

use std::io;
use std::sync::Arc;

use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::{Args, Commands};
use crate::core::config::Config;
use crate::core::context::CommandContext;
use crate::core::dispatch::{self, CommandRequest, CommandResponse};

/// Initialize env_logger. Logs go to stderr so stdout only carries results.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Build the request for a one-shot subcommand. Returns `None` for subcommands
/// that are not command invocations.
pub fn request_for(command: &Commands) -> Result<Option<CommandRequest>, Box<dyn std::error::Error>> {
    let request = match command {
        Commands::Call {
            name,
            args,
            current_dir,
        } => {
            let args: Value = serde_json::from_str(args)
                .map_err(|e| format!("--args is not valid JSON: {}", e))?;
            CommandRequest::new(
                name,
                args,
                CommandContext {
                    current_dir: current_dir.clone(),
                },
            )
        }
        Commands::Tree {
            directory,
            current_dir,
        } => CommandRequest::new(
            "tree",
            json!({ "directory": directory.clone().unwrap_or_default() }),
            CommandContext {
                current_dir: current_dir.clone(),
            },
        ),
        Commands::Exec { cmd } => CommandRequest::new(
            "execute_command",
            json!({ "cmd": cmd }),
            CommandContext::default(),
        ),
        Commands::Mkdir { absolute_path } => CommandRequest::new(
            "mkdir",
            json!({ "absolute_path": absolute_path }),
            CommandContext::default(),
        ),
        Commands::RunPython { text } => {
            let text = if text == "-" {
                io::read_to_string(io::stdin())?
            } else {
                text.clone()
            };
            CommandRequest::new("run_python", json!({ "text": text }), CommandContext::default())
        }
        Commands::Tools | Commands::Serve | Commands::Completions { .. } => return Ok(None),
    };
    Ok(Some(request))
}

/// Render a successful result for the terminal: text verbatim, structures as pretty JSON.
fn render(result: &Value) -> Result<String, serde_json::Error> {
    match result {
        Value::String(s) => Ok(s.clone()),
        other => serde_json::to_string_pretty(other).map(|s| s + "\n"),
    }
}

/// Run one command and print its result to stdout. Exits with status 1 on failure.
pub async fn run_once(
    request: CommandRequest,
    config: Arc<Config>,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = dispatch::dispatch(request, config).await;
    match (response.result, response.error) {
        (Some(result), _) if response.ok => {
            let text = render(&result)?;
            print!("{}", text);
            if !text.is_empty() && !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        (_, error) => {
            eprintln!("Error: {}", error.unwrap_or_default());
            std::process::exit(1);
        }
    }
}

/// Print all tool definitions as a JSON array.
pub fn print_tools(config: &Config) -> Result<(), serde_json::Error> {
    let defs = crate::core::tools::definitions(config);
    println!("{}", serde_json::to_string_pretty(&defs)?);
    Ok(())
}

/// Serve line-delimited JSON requests from stdin until EOF.
///
/// Every request runs in its own task; responses are written as they
/// complete, so hosts correlate them by `id`.
pub async fn serve(config: Arc<Config>) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<CommandResponse>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = rx.recv().await {
            let mut line = serde_json::to_string(&response).map_err(io::Error::other)?;
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok::<(), io::Error>(())
    });

    log::info!("Serving requests on stdin");
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }
        match dispatch::parse_request(line) {
            Ok(request) => {
                let tx = tx.clone();
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    let response = dispatch::dispatch(request, config).await;
                    let _ = tx.send(response);
                });
            }
            Err(e) => {
                log::warn!("Invalid request: {}", e);
                let _ = tx.send(CommandResponse::failure(
                    Value::Null,
                    format!("Invalid request: {}", e),
                ));
            }
        }
    }

    // Writer exits once every in-flight request has dropped its sender.
    drop(tx);
    writer.await.map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Commands {
        Args::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn request_for_tree() {
        let req = request_for(&parse(&["ah-shell", "tree", "src", "--current-dir", "/p"]))
            .unwrap()
            .unwrap();
        assert_eq!(req.command, "tree");
        assert_eq!(req.args, json!({ "directory": "src" }));
        assert_eq!(req.context.current_dir.unwrap().to_str(), Some("/p"));
    }

    #[test]
    fn request_for_shortcuts() {
        let req = request_for(&parse(&["ah-shell", "exec", "ls -la"])).unwrap().unwrap();
        assert_eq!(req.command, "execute_command");
        assert_eq!(req.args, json!({ "cmd": "ls -la" }));

        let req = request_for(&parse(&["ah-shell", "mkdir", "/tmp/x"])).unwrap().unwrap();
        assert_eq!(req.command, "mkdir");
        assert_eq!(req.args, json!({ "absolute_path": "/tmp/x" }));

        let req = request_for(&parse(&["ah-shell", "run-python", "print(1)"]))
            .unwrap()
            .unwrap();
        assert_eq!(req.command, "run_python");
        assert_eq!(req.args, json!({ "text": "print(1)" }));
    }

    #[test]
    fn request_for_call_rejects_bad_json() {
        let err = request_for(&parse(&["ah-shell", "call", "tree", "--args", "{oops"])).unwrap_err();
        assert!(err.to_string().contains("--args"));
    }

    #[test]
    fn non_invocations_have_no_request() {
        assert!(request_for(&parse(&["ah-shell", "tools"])).unwrap().is_none());
        assert!(request_for(&parse(&["ah-shell", "serve"])).unwrap().is_none());
    }

    #[test]
    fn render_text_and_structures() {
        assert_eq!(render(&json!("hello\n")).unwrap(), "hello\n");
        let rendered = render(&json!([{ "root": ".", "dirs": [], "files": [] }])).unwrap();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("]\n"));
    }
}
