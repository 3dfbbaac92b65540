//! Benchmark runner - Turns a request into one workload run and one result

use std::time::Instant;

use crate::config::Config;
use crate::error::{BenchmarkError, HarnessResult};
use crate::models::{BenchmarkRequest, BenchmarkResult, OperationKind};

use super::invocation::InvocationContext;
use super::process::{ExecutionOutcome, ProcessError, ProcessInvoker, SystemInvoker};

/// Benchmark runner that drives the external workload program
pub struct BenchmarkRunner<P = SystemInvoker> {
    context: InvocationContext,
    invoker: P,
}

impl BenchmarkRunner<SystemInvoker> {
    /// Create a runner that spawns real processes
    pub fn new(context: InvocationContext) -> Self {
        Self::with_invoker(context, SystemInvoker)
    }

    /// Create a runner from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(InvocationContext::from_config(&config.invocation))
    }
}

impl<P: ProcessInvoker> BenchmarkRunner<P> {
    /// Create a runner with a custom process invoker
    pub fn with_invoker(context: InvocationContext, invoker: P) -> Self {
        Self { context, invoker }
    }

    pub fn context(&self) -> &InvocationContext {
        &self.context
    }

    /// Measure one operation kind at one scale.
    ///
    /// Spawns exactly one workload process and never retries. Every failure
    /// is returned classified; no default value is ever substituted.
    pub async fn run(&self, kind: OperationKind, scale: u64) -> HarnessResult<BenchmarkResult> {
        let request = BenchmarkRequest::new(kind, scale)?;
        self.run_request(&request).await
    }

    /// Measure a pre-validated request
    pub async fn run_request(&self, request: &BenchmarkRequest) -> HarnessResult<BenchmarkResult> {
        let (kind, scale) = (request.kind(), request.scale());
        let invocation = self.context.invocation_for(request)?;
        let limit = self.context.timeout();

        tracing::debug!(
            %kind,
            scale,
            cwd = %invocation.working_dir.display(),
            command = %invocation.display_command(),
            "Launching workload"
        );

        let start = Instant::now();
        let outcome = self
            .invoker
            .execute(&invocation, limit)
            .await
            .map_err(|e| match e {
                ProcessError::TimedOut(timeout) => {
                    tracing::warn!(%kind, scale, ?timeout, "Workload timed out");
                    BenchmarkError::Timeout {
                        kind,
                        scale,
                        timeout,
                    }
                }
                ProcessError::NotFound { program, source } => BenchmarkError::Configuration(
                    format!("workload launcher '{}' cannot be started: {}", program, source),
                ),
                ProcessError::Io(e) => BenchmarkError::Io(e),
            })?;

        let result = classify(kind, scale, outcome)?;

        tracing::info!(
            %kind,
            scale,
            ops_per_sec = result.ops_per_sec,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Benchmark completed"
        );

        Ok(result)
    }

    /// Measure on the calling thread, blocking until the workload exits or
    /// the timeout elapses.
    ///
    /// Must not be called from within an async runtime.
    pub fn run_blocking(&self, kind: OperationKind, scale: u64) -> HarnessResult<BenchmarkResult> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        runtime.block_on(self.run(kind, scale))
    }
}

/// Turn one finished process into a result or a classified failure
fn classify(kind: OperationKind, scale: u64, outcome: ExecutionOutcome) -> HarnessResult<BenchmarkResult> {
    if !outcome.success() {
        tracing::warn!(
            %kind,
            scale,
            exit_code = ?outcome.exit_code,
            stderr = %outcome.stderr.trim(),
            "Workload failed"
        );
        return Err(BenchmarkError::Execution {
            kind,
            scale,
            status: outcome.exit_code,
            stderr: outcome.stderr,
        });
    }

    match BenchmarkResult::parse(&outcome.stdout) {
        Some(result) => Ok(result),
        None => {
            tracing::warn!(%kind, scale, stdout = ?outcome.stdout, "Workload output is not a throughput");
            Err(BenchmarkError::Parse {
                kind,
                scale,
                stdout: outcome.stdout,
            })
        }
    }
}
