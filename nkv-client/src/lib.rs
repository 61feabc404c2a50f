//! # Namespaced KV Client
//!
//! Purpose: Provide an async key-value client over a single RESP2
//! connection, with namespaced keys, TTL-bounded writes, and a bounded
//! retry policy on connection failure.
//!
//! ## Design Principles
//! 1. **Explicit State Machine**: Connection lifecycle is a visible set of
//!    states, not a side effect of a third-party client's event model.
//! 2. **Injected Capabilities**: The logger and the transport are narrow
//!    traits supplied at construction, so the retry policy is testable
//!    without a live endpoint.
//! 3. **Bounded Backoff**: Retry delay grows linearly and is capped; a
//!    configured ceiling turns the connection into a terminal failed state.
//! 4. **Collision Avoidance by Prefix**: Every physical key is
//!    `namespace + "-" + logical key`; clients with distinct namespaces
//!    never observe each other's entries.

mod client;
mod config;
mod conn;
mod error;
mod log;
mod resp;
mod transport;

pub use client::KvClient;
pub use config::{ConnectionConfig, RetryDecision};
pub use conn::{ConnStatus, ConnectionManager};
pub use error::{KvError, KvResult};
pub use log::{LogSink, TracingSink};
pub use resp::RespValue;
pub use transport::{Connector, TcpConnector, Transport};
