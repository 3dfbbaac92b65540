//! Invocation context and command-line construction
//!
//! Everything in this module is a pure computation over the configuration:
//! no process is spawned here, and the filesystem is only consulted to
//! resolve the working directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::InvocationConfig;
use crate::constants::RUNTIME_RUN_SUBCOMMAND;
use crate::error::{BenchmarkError, HarnessResult};
use crate::models::BenchmarkRequest;

/// Command and arguments that launch the workload runtime and point it at
/// the workload source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLocator {
    pub launcher: Vec<String>,
    pub path_flag: String,
    pub search_path: PathBuf,
    pub entry_path: PathBuf,
}

impl ProgramLocator {
    /// Argument vector for one request, launcher first
    pub fn command_for(&self, request: &BenchmarkRequest) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.launcher.len() + 6);
        argv.extend(self.launcher.iter().cloned());
        argv.push(RUNTIME_RUN_SUBCOMMAND.to_string());
        argv.push(self.path_flag.clone());
        argv.push(self.search_path.to_string_lossy().into_owned());
        argv.push(self.entry_path.to_string_lossy().into_owned());
        argv.push(request.kind().as_arg().to_string());
        argv.push(request.scale().to_string());
        argv
    }
}

/// Process-wide invocation settings shared by every run of a runner
#[derive(Debug, Clone)]
pub struct InvocationContext {
    project_root: PathBuf,
    timeout: Duration,
    program: ProgramLocator,
    env: BTreeMap<String, String>,
}

impl InvocationContext {
    pub fn new(project_root: impl Into<PathBuf>, timeout: Duration, program: ProgramLocator) -> Self {
        Self {
            project_root: project_root.into(),
            timeout,
            program,
            env: BTreeMap::new(),
        }
    }

    /// Build the context described by a loaded configuration
    pub fn from_config(config: &InvocationConfig) -> Self {
        Self::new(
            config.project_root.clone(),
            Duration::from_secs(config.timeout_seconds),
            ProgramLocator {
                launcher: config.launcher.clone(),
                path_flag: config.path_flag.clone(),
                search_path: config.search_path.clone(),
                entry_path: config.workload_entry.clone(),
            },
        )
    }

    /// Set an environment variable for the workload, on top of the
    /// inherited environment
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn program(&self) -> &ProgramLocator {
        &self.program
    }

    /// Resolve the absolute working directory for a run.
    ///
    /// The root must be absolute, exist and be a directory, so the result
    /// never depends on the harness's current directory.
    pub fn working_directory(&self) -> HarnessResult<PathBuf> {
        if !self.project_root.is_absolute() {
            return Err(BenchmarkError::Configuration(format!(
                "project root {} must be an absolute path",
                self.project_root.display()
            )));
        }

        let root = self.project_root.canonicalize().map_err(|e| {
            BenchmarkError::Configuration(format!(
                "project root {} cannot be resolved: {}",
                self.project_root.display(),
                e
            ))
        })?;

        if !root.is_dir() {
            return Err(BenchmarkError::Configuration(format!(
                "project root {} is not a directory",
                root.display()
            )));
        }

        Ok(root)
    }

    /// Build the full invocation for one request
    pub fn invocation_for(&self, request: &BenchmarkRequest) -> HarnessResult<Invocation> {
        if self.program.launcher.is_empty() {
            return Err(BenchmarkError::Configuration(
                "workload launcher is empty".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(BenchmarkError::Configuration(
                "workload timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Invocation {
            argv: self.program.command_for(request),
            working_dir: self.working_directory()?,
            env: self.env.clone(),
        })
    }
}

/// One fully resolved external-process launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program followed by its arguments
    pub argv: Vec<String>,
    pub working_dir: PathBuf,
    /// Variables set on top of the inherited environment
    pub env: BTreeMap<String, String>,
}

impl Invocation {
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Shell-like rendering for log lines
    pub fn display_command(&self) -> String {
        self.argv.join(" ")
    }
}
