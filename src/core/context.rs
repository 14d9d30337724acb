//! Per-request context supplied by the host runtime.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Context the host attaches to a command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandContext {
    /// Base directory that relative tool paths are joined onto.
    #[serde(default)]
    pub current_dir: Option<PathBuf>,
}

impl CommandContext {
    /// Fill `current_dir` from a configured default when the host left it unset.
    pub fn or_default_dir(mut self, default_dir: Option<&Path>) -> Self {
        if self.current_dir.is_none() {
            self.current_dir = default_dir.map(Path::to_path_buf);
        }
        self
    }

    /// Resolve a tool path against `current_dir`. An empty path means the
    /// current directory itself (`.` when no context is set).
    pub fn resolve(&self, path: &str) -> PathBuf {
        match (&self.current_dir, path.is_empty()) {
            (Some(base), true) => base.clone(),
            (Some(base), false) => base.join(path),
            (None, true) => PathBuf::from("."),
            (None, false) => PathBuf::from(path),
        }
    }
}
