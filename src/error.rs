//! Application error type.
//!
//! Every fallible path funnels into [`AppError`], which carries the process
//! exit code alongside a human-readable message. Exit codes:
//!
//! - `2` — usage / input error (bad flags, unreadable CSV, missing API key)
//! - `3` — no usable data (every record filtered out, fallback not allowed)
//! - `4` — runtime failure (network, terminal, serialization)
//!
//! The pipeline's "no data" condition is deliberately *not* an `AppError`:
//! callers are expected to fall back to the sample dataset, so it is a typed
//! value ([`crate::app::pipeline::NoData`]) instead.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
