//! # Namespaced KV Client API
//!
//! Purpose: Expose the minimal key-value contract (`get`, `set`,
//! `set_ttl`, `disconnect`) over a namespaced, TTL-bounded view of the
//! underlying store.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `KvClient` hides the connection manager and the
//!    wire protocol behind four operations.
//! 2. **Prefix Everything**: Every physical key is
//!    `namespace + "-" + logical key`, applied on every call.
//! 3. **Every Write Expires**: `set` applies the client's default TTL;
//!    `set_ttl` applies the caller's. There are no immortal entries.
//! 4. **Consistent Encoding**: Both write operations store the raw string,
//!    so a `get` always returns exactly what was written.

use std::sync::Arc;

use crate::config::ConnectionConfig;
use crate::conn::{ConnStatus, ConnectionManager};
use crate::error::{KvError, KvResult};
use crate::log::LogSink;
use crate::resp::RespValue;
use crate::transport::{Connector, TcpConnector};

/// Namespaced, TTL-bounded client over a single managed connection.
///
/// The connection handle is exclusively owned by this instance. The
/// namespace is a collision-avoidance contract, not isolation: two
/// clients constructed with the same namespace share a keyspace by
/// design.
pub struct KvClient {
    namespace: String,
    default_ttl_seconds: u64,
    conn: ConnectionManager,
}

impl KvClient {
    /// Creates a client over the production TCP transport.
    ///
    /// `default_ttl_seconds` is the expiry applied by [`set`](Self::set).
    /// No I/O happens until [`connect`](Self::connect) or the first
    /// operation.
    pub fn new(
        namespace: impl Into<String>,
        default_ttl_seconds: u64,
        config: ConnectionConfig,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        Self::with_connector(
            namespace,
            default_ttl_seconds,
            config,
            Box::new(TcpConnector),
            logger,
        )
    }

    /// Creates a client with an injected connector. The seam for tests
    /// and alternative transports.
    pub fn with_connector(
        namespace: impl Into<String>,
        default_ttl_seconds: u64,
        config: ConnectionConfig,
        connector: Box<dyn Connector>,
        logger: Arc<dyn LogSink>,
    ) -> Self {
        KvClient {
            namespace: namespace.into(),
            default_ttl_seconds,
            conn: ConnectionManager::new(config, connector, logger),
        }
    }

    /// Establishes the connection eagerly instead of on first use.
    pub async fn connect(&self) -> KvResult<()> {
        self.conn.connect().await
    }

    /// Current status of the underlying connection.
    pub async fn status(&self) -> ConnStatus {
        self.conn.status().await
    }

    /// Fetches a value by logical key.
    ///
    /// Returns `Ok(None)` when the key is missing or expired; that is a
    /// normal result, not an error.
    pub async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let item_key = self.item_key(key);
        match self.conn.exec(&[b"GET", item_key.as_bytes()]).await? {
            RespValue::Bulk(Some(data)) => {
                let value = String::from_utf8(data).map_err(|_| KvError::UnexpectedResponse)?;
                Ok(Some(value))
            }
            RespValue::Bulk(None) => Ok(None),
            RespValue::Error(message) => Err(server_error(message)),
            _ => Err(KvError::UnexpectedResponse),
        }
    }

    /// Writes a value under the namespaced key with the client's default
    /// TTL. Overwriting resets the expiry (last-writer-wins).
    pub async fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.write(key, value, self.default_ttl_seconds).await
    }

    /// Same as [`set`](Self::set) with a caller-supplied TTL in seconds.
    ///
    /// `ttl_seconds == 0` is forwarded unmodified; the store rejects it
    /// and the server error is surfaced.
    pub async fn set_ttl(&self, key: &str, value: &str, ttl_seconds: u64) -> KvResult<()> {
        self.write(key, value, ttl_seconds).await
    }

    /// Releases the underlying connection. Idempotent; subsequent
    /// operations fail with [`KvError::ConnectionUnavailable`].
    pub async fn disconnect(&self) {
        self.conn.close().await;
    }

    async fn write(&self, key: &str, value: &str, ttl_seconds: u64) -> KvResult<()> {
        let item_key = self.item_key(key);
        let ttl = ttl_seconds.to_string();
        let args: [&[u8]; 5] = [
            b"SET",
            item_key.as_bytes(),
            value.as_bytes(),
            b"EX",
            ttl.as_bytes(),
        ];
        match self.conn.exec(&args).await? {
            RespValue::Simple(_) => Ok(()),
            RespValue::Error(message) => Err(server_error(message)),
            _ => Err(KvError::UnexpectedResponse),
        }
    }

    /// Transforms a logical key into its physical, namespaced form.
    fn item_key(&self, key: &str) -> String {
        format!("{}-{}", self.namespace, key)
    }
}

fn server_error(message: Vec<u8>) -> KvError {
    KvError::Server {
        message: String::from_utf8_lossy(&message).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::TracingSink;

    fn client(namespace: &str) -> KvClient {
        KvClient::new(
            namespace,
            1800,
            ConnectionConfig::default(),
            Arc::new(TracingSink),
        )
    }

    #[test]
    fn physical_key_is_namespace_dash_key() {
        let c = client("graphql_api");
        assert_eq!(c.item_key("username:admin"), "graphql_api-username:admin");
    }

    #[test]
    fn distinct_namespaces_produce_distinct_physical_keys() {
        let a = client("svc_prod");
        let b = client("svc_test");
        assert_ne!(a.item_key("k"), b.item_key("k"));
    }
}
