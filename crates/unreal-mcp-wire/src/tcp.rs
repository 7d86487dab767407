//! TCP transport
//!
//! The editor listens on a plain TCP socket; each side splits its stream into
//! a framed reader and writer.

use crate::transport::{LineReader, LineWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::debug;

/// TCP read wrapper
pub type TcpReadWrapper = LineReader<OwnedReadHalf>;

/// TCP write wrapper
pub type TcpWriteWrapper = LineWriter<OwnedWriteHalf>;

/// Split a connected stream into framed halves
pub fn split(stream: TcpStream, max_frame_bytes: usize) -> (TcpReadWrapper, TcpWriteWrapper) {
    // Responses are small and latency-sensitive.
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let (read_half, write_half) = stream.into_split();
    (
        LineReader::with_limit(read_half, max_frame_bytes),
        LineWriter::new(write_half),
    )
}
