//! Connection handling
//!
//! [`serve_connection`] is independent of the socket type; [`tcp`] wires it
//! to a listener.

pub mod tcp;

pub use tcp::TcpServer;

use crate::config::BridgeConfig;
use crate::game_thread::GameThreadHandle;
use std::time::Duration;
use tracing::{debug, info, warn};
use unreal_mcp_core::{BridgeError, CommandRequest, CommandResponse, Result};
use unreal_mcp_wire::{AsyncReader, AsyncWriter, DEFAULT_MAX_FRAME_BYTES, encode, preview};

/// Per-connection limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionSettings {
    pub receive_timeout: Option<Duration>,
    pub max_frame_bytes: usize,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            receive_timeout: None,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        }
    }
}

impl From<&BridgeConfig> for ConnectionSettings {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            receive_timeout: config.receive_timeout,
            max_frame_bytes: config.max_frame_bytes,
        }
    }
}

/// Answer requests until the peer closes the stream.
///
/// Bad frames get an error envelope and the loop carries on. An oversized
/// frame is answered and then ends the connection, since the framing can no
/// longer be trusted. Socket errors and the receive timeout are returned.
pub async fn serve_connection<R, W>(
    reader: &mut R,
    writer: &mut W,
    handle: &GameThreadHandle,
    receive_timeout: Option<Duration>,
) -> Result<()>
where
    R: AsyncReader,
    W: AsyncWriter,
{
    loop {
        let read = match receive_timeout {
            Some(limit) => tokio::time::timeout(limit, reader.read_message())
                .await
                .map_err(|_| BridgeError::Timeout(format!("no request within {:?}", limit)))?,
            None => reader.read_message().await,
        };

        let frame = match read {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("Client disconnected (EOF)");
                return Ok(());
            }
            Err(e @ BridgeError::FrameTooLarge { .. }) => {
                warn!("{}, closing connection", e);
                send(writer, &CommandResponse::from_error(&e)).await?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        debug!("Received: {}", preview(&frame));

        let response = match CommandRequest::from_slice(&frame) {
            Ok(request) => handle.execute(request).await,
            Err(e) => {
                warn!("Rejected frame: {}", e);
                CommandResponse::from_error(&e)
            }
        };
        send(writer, &response).await?;
    }
}

async fn send<W: AsyncWriter>(writer: &mut W, response: &CommandResponse) -> Result<()> {
    let data = encode(response)?;
    debug!("Sending: {}", preview(&data));
    writer.write_message(&data).await
}
