//! HTTP boundary for snippet execution.
//!
//! One route does the work: `POST /execute` takes `{"code": "..."}`,
//! runs it through validation and the process supervisor, and answers
//! with an [`ExecuteResponse`]. `GET /healthz` reports liveness and the
//! active execution policy.
//!
//! Each accepted request drives exactly one process lifecycle; requests
//! share no state beyond the supervisor's immutable policy, so there is
//! no cross-request ordering and no admission control.

pub mod response;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::error::Result;
use crate::exec::{validate, ProcessSupervisor};
use response::{rejection, translate, ExecuteResponse};

#[derive(Clone)]
pub struct AppState {
    pub supervisor: Arc<ProcessSupervisor>,
    /// Cancelled on shutdown; in-flight executions are killed and
    /// reported as cancelled rather than left running.
    pub shutdown: CancellationToken,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/execute", post(execute_handler))
        .route("/healthz", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the shutdown token fires.
pub async fn serve(config: ServiceConfig, shutdown: CancellationToken) -> Result<()> {
    let state = AppState {
        supervisor: Arc::new(ProcessSupervisor::new(config.policy)),
        shutdown: shutdown.clone(),
    };
    let app = router(state);

    tracing::info!(addr = %config.listen_addr, "Starting execution server");

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    Ok(())
}

async fn execute_handler(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<ExecuteResponse>) {
    // A body that is not a JSON object at all is an internal error, not
    // a validation rejection; the detail stays in the server log.
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Failed to parse request body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ExecuteResponse::failure("internal server error")),
            );
        }
    };

    let code = match validate(body.get("code").and_then(Value::as_str)) {
        Ok(code) => code,
        Err(reason) => {
            tracing::info!(reason = ?reason, "Request rejected before launch");
            let (status, resp) = rejection(&reason);
            return (status, Json(resp));
        }
    };

    let exec_id = Uuid::new_v4();
    let started = Instant::now();
    let outcome = state.supervisor.run(exec_id, &code, &state.shutdown).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(exec_id = %exec_id, elapsed_ms, "Execution resolved");

    let resp = translate(outcome, elapsed_ms, state.supervisor.policy());
    (StatusCode::OK, Json(resp))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    interpreter: String,
    timeout_ms: u64,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let policy = state.supervisor.policy();
    Json(HealthResponse {
        status: "ok",
        interpreter: policy.interpreter.clone(),
        timeout_ms: policy.timeout_ms,
    })
}
