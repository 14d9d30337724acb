//! Exclusion rules for the tree walker.
//!
//! An entry is pruned when its joined path matches one of the built-in
//! patterns or a rule of the root `.gitignore`. The built-in set always
//! applies; an ignore file cannot re-include what it excludes.

use std::path::Path;
use std::sync::LazyLock;

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use super::ToolError;

/// Name of the ignore file read from the walk root.
pub const IGNORE_FILE: &str = ".gitignore";

/// Patterns always excluded from the tree.
pub const DEFAULT_EXCLUDE: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "coverage",
    "__pycache__",
    ".ipynb_checkpoints",
];

/// Each pattern is anchored on the last path component, so `dist` matches
/// `/proj/dist` but not `/proj/distance`.
static DEFAULT_EXCLUDE_SET: LazyLock<GlobSet> = LazyLock::new(|| {
    let mut builder = GlobSetBuilder::new();
    for pattern in DEFAULT_EXCLUDE {
        let glob = Glob::new(&format!("**/{}", pattern))
            .expect("built-in exclude pattern is a valid glob");
        builder.add(glob);
    }
    builder
        .build()
        .expect("built-in exclude patterns compile")
});

/// Returns `true` if the path matches one of the built-in patterns.
pub fn is_default_excluded(path: &Path) -> bool {
    DEFAULT_EXCLUDE_SET.is_match(path)
}

/// Gitignore rules loaded from a single ignore file. Matches nothing when
/// the walk root has no ignore file.
#[derive(Debug, Default)]
pub struct IgnorePredicate {
    gitignore: Option<Gitignore>,
}

impl IgnorePredicate {
    /// Load `<root>/.gitignore` if it exists. Parse errors are returned, not skipped.
    pub fn load(root: &Path) -> Result<Self, ToolError> {
        let path = root.join(IGNORE_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let mut builder = GitignoreBuilder::new(root);
        if let Some(err) = builder.add(&path) {
            return Err(err.into());
        }
        let gitignore = builder.build()?;
        log::debug!(
            "Loaded {} ignore rules from {}",
            gitignore.num_ignores() + gitignore.num_whitelists(),
            path.display()
        );
        Ok(Self {
            gitignore: Some(gitignore),
        })
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.gitignore
            .as_ref()
            .is_some_and(|gi| gi.matched(path, is_dir).is_ignore())
    }
}

/// Union of the built-in patterns and the walk's ignore predicate.
#[derive(Debug, Default)]
pub struct ExcludeFilter {
    ignore: IgnorePredicate,
}

impl ExcludeFilter {
    /// Build the filter for one walk rooted at `root`.
    pub fn for_root(root: &Path) -> Result<Self, ToolError> {
        Ok(Self {
            ignore: IgnorePredicate::load(root)?,
        })
    }

    pub fn should_exclude(&self, path: &Path, is_dir: bool) -> bool {
        is_default_excluded(path) || self.ignore.is_ignored(path, is_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn default_patterns_match_last_component() {
        assert!(is_default_excluded(Path::new("/proj/.git")));
        assert!(is_default_excluded(Path::new("/proj/web/node_modules")));
        assert!(is_default_excluded(Path::new("dist")));
        assert!(is_default_excluded(Path::new("./pkg/__pycache__")));
        assert!(is_default_excluded(Path::new("nb/.ipynb_checkpoints")));
    }

    #[test]
    fn default_patterns_are_not_substrings() {
        assert!(!is_default_excluded(Path::new("/proj/distance")));
        assert!(!is_default_excluded(Path::new("/proj/builder")));
        assert!(!is_default_excluded(Path::new("/proj/.github")));
        assert!(!is_default_excluded(Path::new("/proj/my_node_modules")));
        assert!(!is_default_excluded(Path::new("/proj/src")));
    }

    #[test]
    fn default_patterns_also_match_files() {
        // A plain file named like an excluded directory is dropped as well.
        assert!(is_default_excluded(Path::new("/proj/sub/build")));
        assert!(is_default_excluded(Path::new("/proj/worktree/.git")));
    }

    #[test]
    fn predicate_without_ignore_file_matches_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let pred = IgnorePredicate::load(dir.path()).unwrap();
        assert!(!pred.is_ignored(&dir.path().join("anything.log"), false));
    }

    #[test]
    fn predicate_applies_gitignore_rules() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(IGNORE_FILE),
            "*.log\n!keep.log\nfoo.txt\ntmp/\n",
        )
        .unwrap();
        let pred = IgnorePredicate::load(dir.path()).unwrap();
        let root = dir.path();

        assert!(pred.is_ignored(&root.join("debug.log"), false));
        assert!(!pred.is_ignored(&root.join("keep.log"), false));
        assert!(pred.is_ignored(&root.join("foo.txt"), false));
        assert!(pred.is_ignored(&root.join("a/b/foo.txt"), false));
        assert!(!pred.is_ignored(&root.join("foobar.txt"), false));
        assert!(pred.is_ignored(&root.join("tmp"), true));
        assert!(!pred.is_ignored(&root.join("tmp"), false));
    }

    #[test]
    fn filter_is_union_of_both_sources() {
        let dir = tempfile::TempDir::new().unwrap();
        // Negating a built-in name in the ignore file has no effect.
        fs::write(dir.path().join(IGNORE_FILE), "secret.txt\n!node_modules\n").unwrap();
        let filter = ExcludeFilter::for_root(dir.path()).unwrap();
        let root = dir.path();

        assert!(filter.should_exclude(&root.join("secret.txt"), false));
        assert!(filter.should_exclude(&root.join("node_modules"), true));
        assert!(!filter.should_exclude(&root.join("main.rs"), false));
    }

    #[test]
    fn ignore_file_that_is_a_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::create_dir(dir.path().join(IGNORE_FILE)).unwrap();
        assert!(ExcludeFilter::for_root(dir.path()).is_err());
    }
}
