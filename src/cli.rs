//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  ah-shell tools                          Print tool definitions as JSON
  ah-shell tree src --current-dir /proj   Filtered directory tree of /proj/src
  ah-shell exec \"ls -la\"                  Run a shell command
  ah-shell mkdir /tmp/new_folder          Create a directory (and parents)
  ah-shell run-python -                   Run Python code read from stdin
  ah-shell call tree --args '{\"directory\":\"\"}'
  ah-shell serve                          Line-delimited JSON requests on stdin
  ah-shell completions bash               Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Shell, filesystem and Python commands for agent runtimes",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the definitions of all commands as JSON
    Tools,
    /// Invoke a command by name with JSON arguments
    Call {
        /// Command name (e.g. tree, execute_command)
        name: String,
        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
        /// Base directory for relative paths
        #[arg(long)]
        current_dir: Option<PathBuf>,
    },
    /// List a directory tree, skipping ignored and default-excluded entries
    Tree {
        /// Directory to list (default: current directory)
        directory: Option<String>,
        /// Base directory the listed directory is joined onto
        #[arg(long)]
        current_dir: Option<PathBuf>,
    },
    /// Execute a shell command line
    Exec {
        /// Command line passed to the shell
        cmd: String,
    },
    /// Create a directory, including missing parents
    Mkdir {
        /// Absolute path of the directory
        absolute_path: String,
    },
    /// Execute Python code from a temporary file
    RunPython {
        /// Python source, or '-' to read it from stdin
        text: String,
    },
    /// Serve line-delimited JSON requests on stdin/stdout
    Serve,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
