//! Custom error types and handling
//!
//! Every failure of a benchmark run is classified into one variant of
//! [`BenchmarkError`] and propagated to the caller unchanged. Nothing in the
//! harness retries or substitutes a default value.

use std::time::Duration;

use crate::models::OperationKind;

/// Harness-wide error type
#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    // Setup errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Run outcomes
    #[error("Benchmark {kind} at scale {scale} timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        kind: OperationKind,
        scale: u64,
        timeout: Duration,
    },

    #[error("Benchmark {kind} at scale {scale} failed ({}): {stderr}", describe_status(.status))]
    Execution {
        kind: OperationKind,
        scale: u64,
        /// Exit code, `None` when the process was terminated by a signal
        status: Option<i32>,
        stderr: String,
    },

    #[error("Benchmark {kind} at scale {scale} produced unparseable output: {stdout:?}")]
    Parse {
        kind: OperationKind,
        scale: u64,
        stdout: String,
    },

    // Internal errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_status(status: &Option<i32>) -> String {
    match *status {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl BenchmarkError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Execution { .. } => "EXECUTION_FAILURE",
            Self::Parse { .. } => "PARSE_FAILURE",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the workload was launched and the failure came from its run
    pub fn is_run_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Execution { .. } | Self::Parse { .. }
        )
    }
}

impl From<crate::config::ConfigError> for BenchmarkError {
    fn from(err: crate::config::ConfigError) -> Self {
        BenchmarkError::Configuration(err.to_string())
    }
}

/// Result type alias using BenchmarkError
pub type HarnessResult<T> = Result<T, BenchmarkError>;
