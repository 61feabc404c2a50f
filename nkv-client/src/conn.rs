//! # Connection Manager
//!
//! Purpose: Own the lifecycle of a single logical connection to the
//! remote store, retrying transient failures with bounded backoff and
//! failing permanently once the retry ceiling is reached.
//!
//! ## Design Principles
//! 1. **Serialized Transitions**: All state lives behind one async mutex,
//!    so concurrent callers observe a consistent lifecycle.
//! 2. **Transparent Retry**: Transient connect failures never reach the
//!    caller; they are absorbed by the backoff loop up to the ceiling.
//! 3. **Terminal Failure**: Once failed or closed, every operation fails
//!    fast; recovery requires a new manager.
//! 4. **Queue Until Reconnected**: Operations issued while a reconnect is
//!    in progress wait on the state mutex and run once the connection is
//!    re-established, rather than failing fast.
//!
//! ## State Machine
//!
//! ```text
//! Disconnected --connect/op--> Connecting --ok--> Connected
//!                                  |                  |
//!                                  | transport failure| transport error
//!                                  v                  v
//!                              Retrying --delay--> Connecting
//!                                  |
//!                                  | ceiling reached
//!                                  v
//!                               Failed (terminal)      Closed (terminal, via close())
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::config::{ConnectionConfig, RetryDecision};
use crate::error::{KvError, KvResult};
use crate::log::LogSink;
use crate::resp::RespValue;
use crate::transport::{Connector, Transport};

/// Logical connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnStatus {
    Disconnected,
    Connecting,
    Connected,
    Retrying,
    Failed,
    Closed,
}

struct ConnState {
    status: ConnStatus,
    /// Consecutive failed connection attempts in the current cycle.
    /// Reset to zero on every successful connect.
    attempts: u32,
    transport: Option<Box<dyn Transport>>,
}

/// Manages one logical connection to the remote store.
pub struct ConnectionManager {
    config: ConnectionConfig,
    connector: Box<dyn Connector>,
    logger: Arc<dyn LogSink>,
    state: Mutex<ConnState>,
}

impl ConnectionManager {
    /// Creates a manager in the disconnected state. No I/O happens until
    /// [`connect`](Self::connect) or the first operation.
    pub fn new(
        config: ConnectionConfig,
        connector: Box<dyn Connector>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        ConnectionManager {
            config,
            connector,
            logger,
            state: Mutex::new(ConnState {
                status: ConnStatus::Disconnected,
                attempts: 0,
                transport: None,
            }),
        }
    }

    /// Current lifecycle status.
    pub async fn status(&self) -> ConnStatus {
        self.state.lock().await.status
    }

    /// Establishes the connection eagerly.
    ///
    /// Transient failures are retried internally; the only errors are
    /// [`KvError::RetryLimitExceeded`] when the ceiling is exhausted and
    /// [`KvError::ConnectionUnavailable`] when the manager is already
    /// failed or closed.
    pub async fn connect(&self) -> KvResult<()> {
        let mut state = self.state.lock().await;
        match state.status {
            ConnStatus::Connected => Ok(()),
            ConnStatus::Failed | ConnStatus::Closed => Err(KvError::ConnectionUnavailable),
            _ => self.establish(&mut state).await,
        }
    }

    /// Executes one command, reconnecting first if needed.
    ///
    /// A transport failure during the call is surfaced to this caller
    /// only; the connection moves to retrying and the next operation
    /// drives the reconnect.
    pub async fn exec(&self, args: &[&[u8]]) -> KvResult<RespValue> {
        let mut state = self.state.lock().await;
        match state.status {
            ConnStatus::Failed | ConnStatus::Closed => {
                return Err(KvError::ConnectionUnavailable)
            }
            ConnStatus::Connected => {}
            _ => self.establish(&mut state).await?,
        }

        let transport = state
            .transport
            .as_mut()
            .ok_or(KvError::ConnectionUnavailable)?;

        match transport.exec(args).await {
            Ok(response) => Ok(response),
            Err(err) => {
                self.logger
                    .error(&format!("kv client connection error: {err}"));
                state.transport = None;
                state.status = ConnStatus::Retrying;
                Err(KvError::Io(err))
            }
        }
    }

    /// Closes the connection and releases the transport. Terminal and
    /// idempotent; only the first call logs the closed event.
    pub async fn close(&self) {
        let mut state = self.state.lock().await;
        if state.status == ConnStatus::Closed {
            return;
        }
        state.transport = None;
        state.status = ConnStatus::Closed;
        self.logger.info("kv client connection closed");
    }

    /// Runs the connect/retry cycle while holding the state lock, so
    /// concurrent operations queue behind it.
    async fn establish(&self, state: &mut ConnState) -> KvResult<()> {
        loop {
            state.status = ConnStatus::Connecting;
            self.logger
                .trace(&format!("connecting to {}", self.config.addr()));

            match self.connector.connect(&self.config).await {
                Ok(transport) => {
                    state.transport = Some(transport);
                    state.attempts = 0;
                    state.status = ConnStatus::Connected;
                    self.logger
                        .info(&format!("kv client connected to {}", self.config.addr()));
                    return Ok(());
                }
                Err(err) => {
                    state.attempts += 1;
                    self.logger.debug(&format!(
                        "connection attempt {} failed: {err}",
                        state.attempts
                    ));

                    match self.config.retry_delay(state.attempts) {
                        RetryDecision::Delay(delay) => {
                            state.status = ConnStatus::Retrying;
                            sleep(delay).await;
                        }
                        RetryDecision::Abort => {
                            state.transport = None;
                            state.status = ConnStatus::Failed;
                            let limit = self.config.max_retries;
                            self.logger.error(&format!(
                                "maximum retry connection limit of {limit} reached"
                            ));
                            return Err(KvError::RetryLimitExceeded { limit });
                        }
                    }
                }
            }
        }
    }
}
