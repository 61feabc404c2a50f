//! # RESP2 Encoding and Parsing
//!
//! Purpose: Encode client commands and parse server responses without
//! external protocol dependencies, keeping allocations under control.
//!
//! ## Design Principles
//! 1. **State-Free Parsing**: Responses are parsed top-down with minimal state.
//! 2. **Buffer Reuse**: Caller provides buffers to avoid per-call allocations.
//! 3. **Binary-Safe**: Bulk strings are treated as raw bytes.
//! 4. **Fail Fast**: Invalid framing returns protocol errors immediately.

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::error::{KvError, KvResult};

/// RESP response value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// +OK or +PONG style responses.
    Simple(Vec<u8>),
    /// -ERR ... responses.
    Error(Vec<u8>),
    /// :123 responses.
    Integer(i64),
    /// $... bulk strings, with None for null.
    Bulk(Option<Vec<u8>>),
    /// *... arrays (rare in this client).
    Array(Vec<RespValue>),
}

/// Encodes a RESP2 array command into the provided buffer.
pub fn encode_command(args: &[&[u8]], out: &mut Vec<u8>) {
    out.push(b'*');
    push_usize(out, args.len());
    out.extend_from_slice(b"\r\n");
    for arg in args {
        out.push(b'$');
        push_usize(out, arg.len());
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(arg);
        out.extend_from_slice(b"\r\n");
    }
}

/// Reads one RESP value from the buffered reader.
pub fn read_response<'a, R>(
    reader: &'a mut R,
    line_buf: &'a mut Vec<u8>,
) -> Pin<Box<dyn Future<Output = KvResult<RespValue>> + Send + 'a>>
where
    R: AsyncBufRead + Unpin + Send,
{
    // Boxed future because array replies recurse.
    Box::pin(async move {
        read_line(reader, line_buf).await?;
        if line_buf.is_empty() {
            return Err(KvError::Protocol);
        }

        match line_buf[0] {
            b'+' => Ok(RespValue::Simple(line_buf[1..].to_vec())),
            b'-' => Ok(RespValue::Error(line_buf[1..].to_vec())),
            b':' => Ok(RespValue::Integer(parse_i64(&line_buf[1..])?)),
            b'$' => {
                let len = parse_i64(&line_buf[1..])?;
                parse_bulk(reader, len, line_buf).await
            }
            b'*' => {
                let len = parse_i64(&line_buf[1..])?;
                parse_array(reader, len, line_buf).await
            }
            _ => Err(KvError::Protocol),
        }
    })
}

async fn parse_bulk<R>(reader: &mut R, len: i64, line_buf: &mut Vec<u8>) -> KvResult<RespValue>
where
    R: AsyncBufRead + Unpin + Send,
{
    if len < 0 {
        return Ok(RespValue::Bulk(None));
    }
    let len = len as usize;
    let mut data = vec![0u8; len];
    reader.read_exact(&mut data).await?;

    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf).await?;
    if crlf != [b'\r', b'\n'] {
        return Err(KvError::Protocol);
    }

    line_buf.clear();
    Ok(RespValue::Bulk(Some(data)))
}

async fn parse_array<R>(reader: &mut R, len: i64, line_buf: &mut Vec<u8>) -> KvResult<RespValue>
where
    R: AsyncBufRead + Unpin + Send,
{
    if len <= 0 {
        return Ok(RespValue::Array(Vec::new()));
    }

    let mut items = Vec::with_capacity(len as usize);
    for _ in 0..len {
        items.push(read_response(reader, line_buf).await?);
    }
    Ok(RespValue::Array(items))
}

async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> KvResult<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    buf.clear();
    let bytes = reader.read_until(b'\n', buf).await?;
    if bytes == 0 {
        return Err(KvError::Protocol);
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(KvError::Protocol);
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_i64(data: &[u8]) -> KvResult<i64> {
    if data.is_empty() {
        return Err(KvError::Protocol);
    }
    let mut negative = false;
    let mut idx = 0;
    if data[0] == b'-' {
        negative = true;
        idx = 1;
    }

    let mut value: i64 = 0;
    while idx < data.len() {
        let b = data[idx];
        if !b.is_ascii_digit() {
            return Err(KvError::Protocol);
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
        idx += 1;
    }

    if negative {
        Ok(-value)
    } else {
        Ok(value)
    }
}

fn push_usize(out: &mut Vec<u8>, mut value: usize) {
    // Write digits into a small stack buffer to avoid heap allocations.
    let mut buf = [0u8; 20];
    let mut len = 0;
    if value == 0 {
        buf[0] = b'0';
        len = 1;
    } else {
        while value > 0 {
            buf[len] = b'0' + (value % 10) as u8;
            value /= 10;
            len += 1;
        }
    }
    for idx in (0..len).rev() {
        out.push(buf[idx]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn parse(input: &[u8]) -> KvResult<RespValue> {
        let mut reader = tokio::io::BufReader::new(input);
        let mut line = Vec::new();
        read_response(&mut reader, &mut line).await
    }

    #[test]
    fn encodes_command() {
        let mut buf = Vec::new();
        encode_command(&[b"GET", b"key"], &mut buf);
        assert_eq!(&buf, b"*2\r\n$3\r\nGET\r\n$3\r\nkey\r\n");
    }

    #[tokio::test]
    async fn parses_simple_string() {
        let resp = parse(b"+OK\r\n").await.unwrap();
        assert_eq!(resp, RespValue::Simple(b"OK".to_vec()));
    }

    #[tokio::test]
    async fn parses_bulk_string() {
        let resp = parse(b"$5\r\nhello\r\n").await.unwrap();
        assert_eq!(resp, RespValue::Bulk(Some(b"hello".to_vec())));
    }

    #[tokio::test]
    async fn parses_null_bulk_string() {
        let resp = parse(b"$-1\r\n").await.unwrap();
        assert_eq!(resp, RespValue::Bulk(None));
    }

    #[tokio::test]
    async fn parses_integer() {
        let resp = parse(b":42\r\n").await.unwrap();
        assert_eq!(resp, RespValue::Integer(42));
    }

    #[tokio::test]
    async fn parses_error() {
        let resp = parse(b"-ERR bad\r\n").await.unwrap();
        assert_eq!(resp, RespValue::Error(b"ERR bad".to_vec()));
    }

    #[tokio::test]
    async fn rejects_missing_crlf() {
        assert!(matches!(parse(b"+OK\n").await, Err(KvError::Protocol)));
    }

    #[tokio::test]
    async fn parses_array() {
        let resp = parse(b"*2\r\n$1\r\na\r\n:7\r\n").await.unwrap();
        assert_eq!(
            resp,
            RespValue::Array(vec![
                RespValue::Bulk(Some(b"a".to_vec())),
                RespValue::Integer(7),
            ])
        );
    }
}
