use std::net::SocketAddr;
use std::time::Duration;

/// Policy for one interpreter invocation.
///
/// The interpreter binary is resolved through the host's executable
/// search path. The deadline applies per execution, wall-clock.
#[derive(Debug, Clone)]
pub struct ExecPolicy {
    /// Interpreter binary invoked as `<interpreter> -c <code>`
    pub interpreter: String,
    /// Wall-clock deadline for one execution, in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExecPolicy {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout_ms: 30_000,
        }
    }
}

impl ExecPolicy {
    pub fn new(interpreter: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout_ms,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whole seconds of the deadline, as shown in user-facing messages.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_ms / 1000
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub policy: ExecPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            // SAFETY: This is a hardcoded valid address that will always parse
            listen_addr: "127.0.0.1:8080"
                .parse()
                .expect("default listen address is valid"),
            policy: ExecPolicy::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new(listen_addr: SocketAddr, policy: ExecPolicy) -> Self {
        Self {
            listen_addr,
            policy,
        }
    }
}
