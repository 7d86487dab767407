//! TCP listener
//!
//! One client at a time: a connection is served to completion before the
//! next `accept`.

use super::{ConnectionSettings, serve_connection};
use crate::game_thread::GameThreadHandle;
use std::future::{Future, pending};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use unreal_mcp_core::{BridgeError, Result};
use unreal_mcp_wire::tcp::split;

const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

pub struct TcpServer {
    listener: TcpListener,
    handle: GameThreadHandle,
    settings: ConnectionSettings,
}

impl TcpServer {
    pub async fn bind(
        addr: SocketAddr,
        handle: GameThreadHandle,
        settings: ConnectionSettings,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BridgeError::Io(format!("Failed to bind {}: {}", addr, e)))?;
        info!("Unreal MCP bridge listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            handle,
            settings,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process exits
    pub async fn run(self) -> Result<()> {
        self.run_until(pending()).await
    }

    /// Serve until `shutdown` resolves. A connection that is open at that
    /// point is dropped; a command already queued still runs on the game
    /// thread.
    pub async fn run_until<S>(self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        error!("Accept failed: {}", e);
                        tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                        continue;
                    }
                },
            };

            info!("Client connected: {}", peer);
            let (mut reader, mut writer) = split(stream, self.settings.max_frame_bytes);
            let session = serve_connection(
                &mut reader,
                &mut writer,
                &self.handle,
                self.settings.receive_timeout,
            );

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Dropping connection from {} for shutdown", peer);
                    break;
                }
                result = session => match result {
                    Ok(()) => info!("Connection closed: {}", peer),
                    Err(e @ BridgeError::Timeout(_)) => warn!("Connection {} timed out: {}", peer, e),
                    Err(e) => error!("Connection {} failed: {}", peer, e),
                },
            }
        }
        info!("Unreal MCP bridge stopped");
        Ok(())
    }
}
