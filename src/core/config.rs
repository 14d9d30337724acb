use std::env;
use std::path::PathBuf;

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Interpreter used by `run_python` (`AH_SHELL_PYTHON`).
    pub python: Option<String>,
    /// Directory for `run_python` scripts (`AH_SHELL_TMP_DIR`).
    pub tmp_dir: Option<PathBuf>,
    /// Default `current_dir` for requests without one (`AH_SHELL_CURRENT_DIR`).
    pub current_dir: Option<PathBuf>,
}

impl Config {
    /// Temp directory for scratch scripts, falling back to the system temp dir.
    pub fn tmp_dir(&self) -> PathBuf {
        self.tmp_dir.clone().unwrap_or_else(env::temp_dir)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTmpDir(PathBuf),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTmpDir(p) => {
                write!(f, "AH_SHELL_TMP_DIR is not a directory: {}", p.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from environment.
pub fn load() -> Result<Config, ConfigError> {
    from_lookup(|key| env::var(key).ok())
}

fn from_lookup<F>(get: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

    let python = non_empty("AH_SHELL_PYTHON");

    let tmp_dir = non_empty("AH_SHELL_TMP_DIR").map(PathBuf::from);
    if let Some(ref dir) = tmp_dir
        && !dir.is_dir()
    {
        return Err(ConfigError::InvalidTmpDir(dir.clone()));
    }

    let current_dir = non_empty("AH_SHELL_CURRENT_DIR").map(PathBuf::from);

    Ok(Config {
        python,
        tmp_dir,
        current_dir,
    })
}
