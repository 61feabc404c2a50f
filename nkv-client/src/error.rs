//! # Client Error Taxonomy
//!
//! Transient connect failures are retried internally and never appear
//! here. What a caller can see splits into connection-lifecycle errors
//! (`RetryLimitExceeded`, `ConnectionUnavailable`) and per-call remote
//! failures that leave the connection state untouched.

use thiserror::Error;

/// Result type for all client operations.
pub type KvResult<T> = Result<T, KvError>;

/// Errors surfaced by the namespaced KV client.
#[derive(Debug, Error)]
pub enum KvError {
    /// The reconnect cycle exhausted its retry ceiling. Raised once by the
    /// operation that drove the cycle; afterwards the connection is failed
    /// and operations report [`KvError::ConnectionUnavailable`].
    #[error("maximum retry connection limit of {limit} reached")]
    RetryLimitExceeded { limit: u32 },

    /// The connection is failed or closed. Recoverable only by
    /// constructing a new client.
    #[error("connection unavailable")]
    ConnectionUnavailable,

    /// Network or IO failure while an operation was in flight. The
    /// connection enters the retrying state; the next operation
    /// reconnects.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// RESP2 framing or parse error in the server reply.
    #[error("protocol error")]
    Protocol,

    /// Server returned an error reply for this call.
    #[error("server error: {message}")]
    Server { message: String },

    /// Reply type did not match the expected command response.
    #[error("unexpected response")]
    UnexpectedResponse,
}

impl KvError {
    /// True for errors a caller should treat as service-unavailable,
    /// as opposed to a normal absent-value result.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            KvError::RetryLimitExceeded { .. } | KvError::ConnectionUnavailable
        )
    }
}
