//! Harness configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. Configuration is an explicit value handed to the runner; nothing
//! here is global state.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::constants::{
    env_vars, DEFAULT_LAUNCHER, DEFAULT_LOG_FILTER, DEFAULT_PATH_FLAG, DEFAULT_SEARCH_PATH,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_WORKLOAD_ENTRY, PROJECT_ROOT_ANCESTOR_DEPTH,
};

/// Main harness configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub invocation: InvocationConfig,
    pub logging: LoggingConfig,
}

/// How the external workload program is located and launched
#[derive(Debug, Clone)]
pub struct InvocationConfig {
    /// Directory the workload runs in; relative paths below resolve against it
    pub project_root: PathBuf,
    /// Wall-clock bound for one workload run
    pub timeout_seconds: u64,
    /// Command prefix that reaches the workload runtime (e.g. `pixi run mojo`)
    pub launcher: Vec<String>,
    /// Flag that adds a module search path
    pub path_flag: String,
    /// Module search path, relative to the project root
    pub search_path: PathBuf,
    /// Workload entry file, relative to the project root
    pub workload_entry: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub rust_log: String,
}

/// `.env` file applied to the process environment, loaded at most once
static DOTENV: LazyLock<Option<PathBuf>> = LazyLock::new(|| dotenvy::dotenv().ok());

/// Apply the nearest `.env` file to the process environment.
///
/// Only the first call touches the environment; later calls return the
/// path that was loaded, if any.
pub fn load_dotenv() -> Option<&'static Path> {
    DOTENV.as_deref()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads the process environment only; call [`load_dotenv`] once at
    /// startup to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            invocation: InvocationConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(&lookup),
        })
    }
}

impl InvocationConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_root = match non_empty(lookup(env_vars::PROJECT_ROOT)) {
            Some(root) if Path::new(&root).is_absolute() => PathBuf::from(root),
            Some(_) => return Err(ConfigError::InvalidValue(env_vars::PROJECT_ROOT.to_string())),
            None => default_project_root()?,
        };

        let timeout_seconds = match non_empty(lookup(env_vars::TIMEOUT_SECONDS)) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue(env_vars::TIMEOUT_SECONDS.to_string()))?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let launcher = split_launcher(
            &non_empty(lookup(env_vars::LAUNCHER)).unwrap_or_else(|| DEFAULT_LAUNCHER.to_string()),
        );

        Ok(Self {
            project_root,
            timeout_seconds,
            launcher,
            path_flag: non_empty(lookup(env_vars::PATH_FLAG))
                .unwrap_or_else(|| DEFAULT_PATH_FLAG.to_string()),
            search_path: PathBuf::from(
                non_empty(lookup(env_vars::SEARCH_PATH))
                    .unwrap_or_else(|| DEFAULT_SEARCH_PATH.to_string()),
            ),
            workload_entry: PathBuf::from(
                non_empty(lookup(env_vars::WORKLOAD_ENTRY))
                    .unwrap_or_else(|| DEFAULT_WORKLOAD_ENTRY.to_string()),
            ),
        })
    }
}

impl LoggingConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            rust_log: non_empty(lookup(env_vars::RUST_LOG))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

/// Project root derived from this crate's own location.
///
/// The harness crate sits at `<root>/benchmarks/rust`, so the root is a fixed
/// number of ancestors above the manifest directory. Prefer setting
/// `HARNESS_PROJECT_ROOT` when the layout differs.
pub fn default_project_root() -> Result<PathBuf, ConfigError> {
    project_root_from(Path::new(env!("CARGO_MANIFEST_DIR")), PROJECT_ROOT_ANCESTOR_DEPTH)
}

fn project_root_from(anchor: &Path, depth: usize) -> Result<PathBuf, ConfigError> {
    anchor
        .ancestors()
        .nth(depth)
        .filter(|root| !root.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::Unresolvable(anchor.display().to_string()))
}

fn split_launcher(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),

    #[error("Cannot derive project root from {0}")]
    Unresolvable(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        let invocation = &config.invocation;

        assert_eq!(invocation.timeout_seconds, 300);
        assert_eq!(invocation.launcher, vec!["pixi", "run", "mojo"]);
        assert_eq!(invocation.path_flag, "-I");
        assert_eq!(invocation.search_path, PathBuf::from("src/mojo"));
        assert_eq!(
            invocation.workload_entry,
            PathBuf::from("benchmarks/mojo/bench_numbers.mojo")
        );
        assert_eq!(invocation.project_root, default_project_root().unwrap());
        assert_eq!(config.logging.rust_log, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("HARNESS_PROJECT_ROOT", "/srv/hamt"),
            ("HARNESS_TIMEOUT_SECONDS", "12"),
            ("HARNESS_LAUNCHER", "  mojo  "),
            ("HARNESS_SEARCH_PATH", "lib"),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.invocation.project_root, PathBuf::from("/srv/hamt"));
        assert_eq!(config.invocation.timeout_seconds, 12);
        assert_eq!(config.invocation.launcher, vec!["mojo"]);
        assert_eq!(config.invocation.search_path, PathBuf::from("lib"));
        assert_eq!(config.logging.rust_log, "debug");
    }

    #[test]
    fn test_invalid_timeout() {
        for raw in ["0", "-3", "soon"] {
            let err = Config::from_lookup(lookup_from(&[("HARNESS_TIMEOUT_SECONDS", raw)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref var) if var == "HARNESS_TIMEOUT_SECONDS"));
        }
    }

    #[test]
    fn test_relative_project_root_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("HARNESS_PROJECT_ROOT", "../hamt")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var) if var == "HARNESS_PROJECT_ROOT"));
    }

    #[test]
    fn test_dotenv_is_loaded_once() {
        let first = load_dotenv();
        let second = load_dotenv();

        assert_eq!(first, second);
        if let (Some(a), Some(b)) = (first, second) {
            assert!(std::ptr::eq(a, b));
        }
    }

    #[test]
    fn test_blank_launcher_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[("HARNESS_LAUNCHER", "   ")])).unwrap();
        assert_eq!(config.invocation.launcher, vec!["pixi", "run", "mojo"]);
    }

    #[test]
    fn test_project_root_offset() {
        let root = project_root_from(Path::new("/work/hamt/benchmarks/rust"), 2).unwrap();
        assert_eq!(root, PathBuf::from("/work/hamt"));

        assert!(project_root_from(Path::new("rust"), 2).is_err());
    }
}
