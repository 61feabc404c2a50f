//! # Transport Seam
//!
//! Purpose: Abstract the network mechanism behind the connection manager
//! so the retry policy can be exercised with an injected fake transport
//! instead of a live endpoint.
//!
//! The production transport is a tokio TCP stream speaking RESP2, with
//! the command buffer reused across calls.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::config::ConnectionConfig;
use crate::error::KvError;
use crate::resp::{encode_command, read_response, RespValue};

/// One open channel to the remote store.
///
/// `exec` writes a single command and reads a single reply. An `Err`
/// means the channel is no longer usable; the connection manager drops
/// it and schedules a reconnect.
#[async_trait]
pub trait Transport: Send {
    async fn exec(&mut self, args: &[&[u8]]) -> io::Result<RespValue>;
}

/// Establishes transports for a configured endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, config: &ConnectionConfig) -> io::Result<Box<dyn Transport>>;
}

/// Production connector: TCP with RESP2 framing.
///
/// After the stream opens, issues `AUTH` when a password is configured
/// and `SELECT` when a database index is configured. A failure in either
/// counts as a failed connection attempt and is retried by the manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, config: &ConnectionConfig) -> io::Result<Box<dyn Transport>> {
        let stream = TcpStream::connect((config.host.as_str(), config.port)).await?;
        // Small request/reply payloads; Nagle only adds latency here.
        stream.set_nodelay(true)?;

        let mut transport = TcpTransport {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            write_buf: Vec::with_capacity(256),
        };

        if let Some(password) = &config.password {
            transport.expect_ok(&[b"AUTH", password.as_bytes()]).await?;
        }
        if let Some(database) = config.database {
            let index = database.to_string();
            transport.expect_ok(&[b"SELECT", index.as_bytes()]).await?;
        }

        Ok(Box::new(transport))
    }
}

/// Single TCP connection with reusable buffers.
struct TcpTransport {
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    write_buf: Vec<u8>,
}

impl TcpTransport {
    async fn exec_inner(&mut self, args: &[&[u8]]) -> io::Result<RespValue> {
        self.write_buf.clear();
        encode_command(args, &mut self.write_buf);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buf).await?;
        stream.flush().await?;

        read_response(&mut self.reader, &mut self.line_buf)
            .await
            .map_err(|err| match err {
                KvError::Io(err) => err,
                _ => io::Error::new(io::ErrorKind::InvalidData, "resp framing error"),
            })
    }

    async fn expect_ok(&mut self, args: &[&[u8]]) -> io::Result<()> {
        match self.exec_inner(args).await? {
            RespValue::Simple(_) => Ok(()),
            RespValue::Error(message) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                String::from_utf8_lossy(&message).into_owned(),
            )),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "unexpected handshake reply",
            )),
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn exec(&mut self, args: &[&[u8]]) -> io::Result<RespValue> {
        self.exec_inner(args).await
    }
}
