use axum::http::StatusCode;
use serde::Serialize;

use crate::config::ExecPolicy;
use crate::exec::{ExecutionOutcome, RejectionReason};

/// Wire-level result of one `/execute` call. Derived entirely from an
/// [`ExecutionOutcome`] plus the measured elapsed time.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "executionTimeMs", skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecuteResponse {
    /// Unsuccessful response with no timing attached (rejections and
    /// internal errors, where no process ever ran).
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
            execution_time_ms: None,
        }
    }
}

/// Map a resolved outcome to the response contract.
pub fn translate(outcome: ExecutionOutcome, elapsed_ms: u64, policy: &ExecPolicy) -> ExecuteResponse {
    let (success, output, error) = match outcome {
        ExecutionOutcome::Success { stdout } => (true, Some(stdout), None),
        ExecutionOutcome::RuntimeFailure { stderr, .. } => (false, None, Some(stderr)),
        ExecutionOutcome::Timeout => (
            false,
            None,
            Some(format!(
                "execution cancelled by timeout ({} seconds)",
                policy.timeout_secs()
            )),
        ),
        ExecutionOutcome::Cancelled => (false, None, Some("execution cancelled".to_string())),
        ExecutionOutcome::LaunchFailure { detail } => (false, None, Some(detail)),
    };

    ExecuteResponse {
        success,
        output,
        error,
        execution_time_ms: Some(elapsed_ms),
    }
}

/// Map a validation rejection to its status and body.
///
/// Missing code is the only 400; empty and denied code answer 200 with
/// `success: false`, matching the reference contract.
pub fn rejection(reason: &RejectionReason) -> (StatusCode, ExecuteResponse) {
    let status = match reason {
        RejectionReason::MissingCode => StatusCode::BAD_REQUEST,
        RejectionReason::EmptyCode | RejectionReason::DeniedToken(_) => StatusCode::OK,
    };
    (status, ExecuteResponse::failure(reason.public_message()))
}
