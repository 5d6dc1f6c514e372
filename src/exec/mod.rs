//! Execution core: request filtering and interpreter process supervision.
//!
//! This module owns everything between an accepted request and a
//! resolved outcome:
//! - **Validation**: [`validate`] trims the snippet and applies the
//!   lexical deny-list before any process exists
//! - **Supervision**: [`ProcessSupervisor`] launches the interpreter,
//!   captures stdout/stderr, enforces the wall-clock deadline, and
//!   resolves exactly one [`ExecutionOutcome`] per run
//!
//! # Security Note
//!
//! The deny-list is a deterrent, not an isolation boundary: it is a
//! substring check and trivially bypassable. Snippets run as ordinary
//! OS processes without namespace, cgroup, or seccomp confinement.

pub mod supervisor;
pub mod validate;

pub use supervisor::{ExecutionOutcome, ProcessSupervisor, EMPTY_OUTPUT_PLACEHOLDER};
pub use validate::{validate, RejectionReason, DENIED_TOKENS};
