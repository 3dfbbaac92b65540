//! Process invocation capability
//!
//! The runner never spawns processes directly. It goes through
//! [`ProcessInvoker`], which the system implementation backs with
//! `tokio::process` and tests replace with stubs.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;

use super::invocation::Invocation;

/// Captured result of one finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ExecutionOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    fn from_output(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
            exit_code: status.code(),
        }
    }
}

/// Failures of the invocation itself, as opposed to the workload's own
/// exit status
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("process did not exit within {0:?}")]
    TimedOut(Duration),

    #[error("program '{program}' could not be launched: {source}")]
    NotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("process I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Runs one external process to completion or timeout
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn execute(
        &self,
        invocation: &Invocation,
        timeout: Duration,
    ) -> Result<ExecutionOutcome, ProcessError>;
}

/// Spawns real OS processes through `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInvoker;

#[async_trait]
impl ProcessInvoker for SystemInvoker {
    async fn execute(
        &self,
        invocation: &Invocation,
        limit: Duration,
    ) -> Result<ExecutionOutcome, ProcessError> {
        let program = invocation.program();

        let mut child = Command::new(program)
            .args(invocation.args())
            .envs(&invocation.env)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Backstop for a caller dropping this future mid-run
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    ProcessError::NotFound {
                        program: program.to_string(),
                        source: e,
                    }
                }
                _ => ProcessError::Io(e),
            })?;

        tracing::trace!(pid = ?child.id(), program, "Spawned workload process");

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::other("stderr was not captured"))?;

        let finished = timeout(limit, async {
            tokio::try_join!(
                child.wait(),
                read_all(&mut stdout),
                read_all(&mut stderr)
            )
        })
        .await;

        match finished {
            Ok(Ok((status, out, err))) => Ok(ExecutionOutcome::from_output(status, &out, &err)),
            Ok(Err(e)) => {
                reap(&mut child).await;
                Err(ProcessError::Io(e))
            }
            Err(_) => {
                reap(&mut child).await;
                Err(ProcessError::TimedOut(limit))
            }
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Kill the child and wait for it, so no zombie outlives the run
async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        // The child may already have exited and been collected
        tracing::debug!(pid = ?child.id(), error = %e, "Workload process was not killed");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn shell(script: &str) -> Invocation {
        Invocation {
            argv: vec!["sh".into(), "-c".into(), script.into()],
            working_dir: std::env::temp_dir(),
            env: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr_separately() {
        let outcome = SystemInvoker
            .execute(&shell("echo out; echo err >&2"), Duration::from_secs(10))
            .await
            .unwrap();

        assert!(outcome.success());
        assert_eq!(outcome.stdout, "out\n");
        assert_eq!(outcome.stderr, "err\n");
    }

    #[tokio::test]
    async fn test_reports_exit_code() {
        let outcome = SystemInvoker
            .execute(&shell("exit 3"), Duration::from_secs(10))
            .await
            .unwrap();

        assert!(!outcome.success());
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_env_overrides_and_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut invocation = shell("printf '%s' \"$HAMT_MARKER\"; pwd >&2");
        invocation.working_dir = dir.path().canonicalize().unwrap();
        invocation.env.insert("HAMT_MARKER".into(), "set".into());

        let outcome = SystemInvoker
            .execute(&invocation, Duration::from_secs(10))
            .await
            .unwrap();

        assert_eq!(outcome.stdout, "set");
        assert_eq!(outcome.stderr.trim(), invocation.working_dir.to_string_lossy());
    }

    #[tokio::test]
    async fn test_times_out() {
        let err = SystemInvoker
            .execute(&shell("sleep 5"), Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::TimedOut(_)));
    }

    // The current-thread test runtime spawns from the test thread, so its
    // children list is exactly this test's processes.
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timed_out_child_is_reaped() {
        let err = SystemInvoker
            .execute(&shell("exec sleep 30"), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut(_)));

        let children = std::fs::read_to_string("/proc/thread-self/children").unwrap();
        assert_eq!(children.trim(), "");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let mut invocation = shell("");
        invocation.argv = vec!["/nonexistent/hamt-launcher".into()];

        let err = SystemInvoker
            .execute(&invocation, Duration::from_secs(1))
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::NotFound { .. }));
    }
}
