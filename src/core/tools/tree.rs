//! Tree tool: filtered recursive directory listing.
//!
//! Prunes `.git`, `node_modules` and the other built-in patterns plus
//! anything matched by the root `.gitignore`. Pruned directories are never
//! entered.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use walkdir::WalkDir;

use super::exclude::ExcludeFilter;
use super::{ToolError, parse_args, str_arg, tool_definition};
use crate::core::context::CommandContext;

#[derive(Debug, Deserialize)]
struct TreeArgs {
    #[serde(default)]
    directory: String,
}

/// One visited directory with the subdirectories and files that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub root: String,
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

/// Immediate entries of one directory, in enumeration order.
struct Listing {
    dirs: Vec<String>,
    files: Vec<String>,
    /// Subset of `dirs` that are symlinks; listed but not descended.
    linked_dirs: Vec<String>,
}

/// Enumerate the immediate children of `dir`. Any read error aborts.
fn list_dir(dir: &Path) -> Result<Listing, ToolError> {
    let mut listing = Listing {
        dirs: Vec::new(),
        files: Vec::new(),
        linked_dirs: Vec::new(),
    };

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type();

        if file_type.is_dir() {
            listing.dirs.push(name);
        } else if file_type.is_symlink() && entry.path().is_dir() {
            listing.linked_dirs.push(name.clone());
            listing.dirs.push(name);
        } else {
            listing.files.push(name);
        }
    }
    Ok(listing)
}

/// Walk `directory` in pre-order and return one node per visited directory.
///
/// Fails if the root is missing or not a directory, if the root ignore file
/// cannot be parsed, or if any directory in the tree cannot be read.
pub fn walk(directory: &Path) -> Result<Vec<TreeNode>, ToolError> {
    let meta = fs::metadata(directory).map_err(|source| ToolError::Io {
        path: directory.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ToolError::NotADirectory(directory.to_path_buf()));
    }

    log::debug!("Walking {}", directory.display());
    let filter = ExcludeFilter::for_root(directory)?;

    let mut nodes = Vec::new();
    let mut pending: Vec<PathBuf> = vec![directory.to_path_buf()];

    while let Some(current) = pending.pop() {
        let listing = list_dir(&current)?;

        let dirs: Vec<String> = listing
            .dirs
            .into_iter()
            .filter(|d| !filter.should_exclude(&current.join(d), true))
            .collect();
        let files: Vec<String> = listing
            .files
            .into_iter()
            .filter(|f| !filter.should_exclude(&current.join(f), false))
            .collect();

        // Reversed so the first subdirectory is popped next.
        pending.extend(
            dirs.iter()
                .rev()
                .filter(|d| !listing.linked_dirs.contains(*d))
                .map(|d| current.join(d)),
        );

        nodes.push(TreeNode {
            root: current.to_string_lossy().into_owned(),
            dirs,
            files,
        });
    }

    log::debug!("Walked {}: {} directories", directory.display(), nodes.len());
    Ok(nodes)
}

pub struct TreeTool;

impl super::Tool for TreeTool {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn definition(&self) -> Value {
        tool_definition(
            self.name(),
            "List directory structure excluding patterns from .gitignore and default exclusions (.git, node_modules, dist, build, coverage, __pycache__, .ipynb_checkpoints).",
            json!({
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Directory to list, relative to the current directory (default: current directory)"
                    }
                }
            }),
        )
    }

    fn args_preview(&self, args: &Value) -> String {
        let directory = str_arg(args, "directory");
        if directory.is_empty() {
            ".".to_string()
        } else {
            directory
        }
    }

    fn execute(&self, args: &Value, ctx: &CommandContext) -> Result<Value, ToolError> {
        let parsed: TreeArgs = parse_args(args)?;
        let root = ctx.resolve(&parsed.directory);
        let nodes = walk(&root)?;
        serde_json::to_value(nodes).map_err(ToolError::Serialize)
    }
}
