//! # ah-shell - agent command plugin
//!
//! Exposes four commands to a host agent runtime: `execute_command`,
//! `mkdir`, `run_python` and `tree` (a filtered directory listing).
//!
//! ## Modes
//! - One-shot subcommands (`tree`, `exec`, `mkdir`, `run-python`, `call`)
//! - `serve`: line-delimited JSON requests on stdin, responses on stdout
//! - `tools`: print the command definitions for the host

mod cli;
mod core;
mod run;

use std::error::Error;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use cli::{Args, Commands};
use crate::core::config::Config;

/// Main application entry point
///
/// Handles:
/// - Environment configuration via dotenv
/// - CLI argument parsing and logging setup
/// - Dispatch of one-shot commands or the serve loop
///
/// Any failure is printed with `Display` on stderr and exits with status 1.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    if let Commands::Completions { shell } = args.command {
        let mut cmd = Args::command();
        cli::generate(shell, &mut cmd, core::app::NAME, &mut std::io::stdout());
        return;
    }

    // Load configuration (print user-friendly message; exit uses Display not Debug)
    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let config = Arc::new(config);

    if let Err(e) = run_command(&args.command, config).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_command(command: &Commands, config: Arc<Config>) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Tools => run::print_tools(&config)?,
        Commands::Serve => run::serve(config).await?,
        command => {
            if let Some(request) = run::request_for(command)? {
                run::run_once(request, config).await?;
            }
        }
    }
    Ok(())
}
