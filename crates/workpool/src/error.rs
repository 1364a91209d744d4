//! Error types for the worker pool.
//!
//! This module defines the central `Error` enum. Most of the pool is
//! infallible by construction: a worker either finishes the items it pulled
//! or stops pulling once cancelled, and neither path is an error. The
//! variants here cover configuration, plumbing and the illustrative
//! [`Error::OperationFailed`] kind.
//!
//! ## Error Cases
//! - `OperationFailed`: A coded failure surfaced to the immediate caller.
//! - `ChannelError`: An internal communication failure between tasks.
//! - `InvalidConfig`: A [`PoolConfig`](crate::PoolConfig) failed validation.
//! - `WorkerPanicked`: A worker task panicked or was aborted.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the worker pool.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// A coded failure. Raised synchronously and handed to the caller, who
    /// decides whether to log and continue.
    #[error("Error {code}: {message}")]
    OperationFailed { code: u16, message: String },

    /// Internal channel send/receive failure (e.g., closed channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// The pool configuration was rejected.
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// A worker task ended without reporting how it exited.
    #[error("Worker {worker_id} panicked")]
    WorkerPanicked { worker_id: usize },
}

/// Always fails with [`Error::OperationFailed`] (code 500).
///
/// Exists to show a coded error travelling one call frame up to a caller that
/// logs it and carries on.
pub fn simulate_failure() -> Result<()> {
    Err(Error::OperationFailed {
        code: 500,
        message: "something went wrong".to_string(),
    })
}
