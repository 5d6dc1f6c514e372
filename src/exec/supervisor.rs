use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::ExecPolicy;

/// Placeholder stdout for a clean exit that produced no output.
pub const EMPTY_OUTPUT_PLACEHOLDER: &str = "executed successfully, no output";

/// Terminal result of one interpreter invocation.
///
/// Exactly one variant is produced per [`ProcessSupervisor::run`] call,
/// whichever of {process exit, deadline, cancellation, launch error}
/// happens first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Exit code 0. `stdout` is the captured output, or the placeholder
    /// message if the process printed nothing.
    Success { stdout: String },
    /// Nonzero or signal-terminated exit. `stderr` falls back to a
    /// generic message when the process wrote nothing to stderr.
    /// `exit_code` is `None` for signal termination.
    RuntimeFailure {
        stderr: String,
        exit_code: Option<i32>,
    },
    /// The supervisory timer fired before the process exited.
    Timeout,
    /// The caller's cancellation token fired before the process exited.
    Cancelled,
    /// The process never started.
    LaunchFailure { detail: String },
}

/// Owns the full lifecycle of one interpreter invocation: launch,
/// stream capture, deadline enforcement, and outcome resolution.
///
/// Each call to [`run`](Self::run) is independent; the supervisor holds
/// no per-execution state, so one instance serves concurrent requests.
/// Failed or timed-out executions are reported, never retried.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    policy: ExecPolicy,
}

impl ProcessSupervisor {
    pub fn new(policy: ExecPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ExecPolicy {
        &self.policy
    }

    /// Execute `code` in a fresh interpreter process under the
    /// configured wall-clock deadline.
    ///
    /// The code is passed as a single argument-vector element
    /// (`<interpreter> -c <code>`), never through a shell, so snippet
    /// text cannot inject into the invocation itself. Output is
    /// captured unbounded; a snippet that floods stdout can exhaust
    /// memory (see DESIGN.md).
    pub async fn run(
        &self,
        exec_id: Uuid,
        code: &str,
        cancel: &CancellationToken,
    ) -> ExecutionOutcome {
        tracing::info!(
            exec_id = %exec_id,
            interpreter = %self.policy.interpreter,
            timeout_ms = self.policy.timeout_ms,
            "Launching interpreter"
        );

        let mut child = match Command::new(&self.policy.interpreter)
            .arg("-c")
            .arg(code)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(exec_id = %exec_id, error = %e, "Failed to launch interpreter");
                return launch_failure(e);
            }
        };

        // Drain both pipes concurrently with the wait below; a process
        // that fills a pipe buffer would otherwise block forever and
        // turn every chatty snippet into a timeout.
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        // Single race over {exit, timer, cancellation}: the first event
        // to complete resolves the outcome, the others are never
        // observed. The kill is SIGKILL; untrusted code must not get a
        // signal it can trap.
        let status = tokio::select! {
            status = child.wait() => status,
            _ = tokio::time::sleep(self.policy.timeout()) => {
                tracing::warn!(exec_id = %exec_id, timeout_ms = self.policy.timeout_ms, "Deadline exceeded, killing interpreter");
                let _ = child.start_kill();
                let _ = child.wait().await;
                return ExecutionOutcome::Timeout;
            }
            _ = cancel.cancelled() => {
                tracing::warn!(exec_id = %exec_id, "Execution cancelled, killing interpreter");
                let _ = child.start_kill();
                let _ = child.wait().await;
                return ExecutionOutcome::Cancelled;
            }
        };

        let status = match status {
            Ok(status) => status,
            Err(e) => {
                tracing::error!(exec_id = %exec_id, error = %e, "Failed to reap interpreter");
                return ExecutionOutcome::LaunchFailure {
                    detail: format!("error launching process: {}", e),
                };
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();
        let exit_code = status.code();

        if status.success() {
            tracing::info!(exec_id = %exec_id, "Interpreter exited cleanly");
            ExecutionOutcome::Success {
                stdout: if stdout.is_empty() {
                    EMPTY_OUTPUT_PLACEHOLDER.to_string()
                } else {
                    stdout
                },
            }
        } else {
            tracing::info!(exec_id = %exec_id, exit_code = ?exit_code, "Interpreter exited with failure");
            ExecutionOutcome::RuntimeFailure {
                stderr: if stderr.is_empty() {
                    exit_message(exit_code)
                } else {
                    stderr
                },
                exit_code,
            }
        }
    }
}

fn exit_message(exit_code: Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("process exited with code {}", code),
        None => "process terminated by signal".to_string(),
    }
}

fn launch_failure(e: std::io::Error) -> ExecutionOutcome {
    let detail = if e.kind() == std::io::ErrorKind::NotFound {
        "interpreter not installed or not found".to_string()
    } else {
        format!("error launching process: {}", e)
    };
    ExecutionOutcome::LaunchFailure { detail }
}

/// Accumulate everything a pipe produces until EOF. Invalid UTF-8 is
/// replaced rather than rejected.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    String::from_utf8_lossy(&buf).into_owned()
}
