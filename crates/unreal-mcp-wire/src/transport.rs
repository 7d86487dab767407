//! Transport abstractions for the command bridge
//!
//! Provides AsyncReader/AsyncWriter traits and the newline-delimited
//! implementations used for every stream the bridge speaks over.

use crate::protocol::DEFAULT_MAX_FRAME_BYTES;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::trace;
use unreal_mcp_core::{BridgeError, Result};

/// Trait for async reading from a transport
#[async_trait]
pub trait AsyncReader: Send {
    /// Read the next complete frame, without its terminator.
    /// Returns `Ok(None)` once the peer has closed the stream.
    async fn read_message(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Trait for async writing to a transport
#[async_trait]
pub trait AsyncWriter: Send {
    /// Write one frame followed by its terminator and flush
    async fn write_message(&mut self, data: &[u8]) -> Result<()>;
}

/// Reads `\n`-terminated frames.
///
/// A trailing `\r` is stripped and blank lines are skipped. If the stream
/// ends in the middle of a line, that partial line is returned as the last
/// frame. A line longer than the limit yields [`BridgeError::FrameTooLarge`],
/// after which the stream position is unspecified.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_frame_bytes: usize,
}

impl<R: AsyncRead + Unpin + Send> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_limit(inner, DEFAULT_MAX_FRAME_BYTES)
    }

    pub fn with_limit(inner: R, max_frame_bytes: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_frame_bytes,
        }
    }

    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> AsyncReader for LineReader<R> {
    async fn read_message(&mut self) -> Result<Option<Vec<u8>>> {
        // Room for a "\r\n" terminator after a line of exactly `max_frame_bytes`.
        let limit = self.max_frame_bytes as u64 + 2;
        loop {
            let mut buf = Vec::new();
            let n = (&mut self.inner)
                .take(limit)
                .read_until(b'\n', &mut buf)
                .await
                .map_err(|e| BridgeError::Io(format!("Read failed: {}", e)))?;
            if n == 0 {
                return Ok(None);
            }

            let terminated = buf.last() == Some(&b'\n');
            if terminated {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            if buf.len() > self.max_frame_bytes {
                return Err(BridgeError::FrameTooLarge {
                    limit: self.max_frame_bytes,
                });
            }

            if buf.iter().all(u8::is_ascii_whitespace) {
                if terminated {
                    continue;
                }
                return Ok(None);
            }
            if !terminated {
                trace!("Unterminated final frame, {} bytes", buf.len());
            }
            return Ok(Some(buf));
        }
    }
}

/// Writes frames terminated by `\n`
pub struct LineWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin + Send> LineWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> AsyncWriter for LineWriter<W> {
    async fn write_message(&mut self, data: &[u8]) -> Result<()> {
        self.inner
            .write_all(data)
            .await
            .map_err(|e| BridgeError::Io(format!("Write failed: {}", e)))?;
        self.inner
            .write_all(b"\n")
            .await
            .map_err(|e| BridgeError::Io(format!("Write newline failed: {}", e)))?;
        self.inner
            .flush()
            .await
            .map_err(|e| BridgeError::Io(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}
