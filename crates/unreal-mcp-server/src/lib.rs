//! # unreal-mcp-server
//!
//! TCP command bridge for the Unreal Editor.
//!
//! This crate provides:
//! - `Router` mapping command names to handlers
//! - Command handlers for assets, levels, actors, landscapes, Blueprints and UMG
//! - `GameThread` that owns the editor and runs every command in order
//! - `TcpServer` speaking newline-delimited JSON
//! - `BridgeConfig` read from the environment and Unreal-style flags

pub mod commands;
pub mod config;
pub mod game_thread;
pub mod router;
pub mod transport;

pub use config::{BridgeConfig, ConfigError};
pub use game_thread::{GameThread, GameThreadHandle};
pub use router::{CommandHandler, Router};
pub use transport::{ConnectionSettings, TcpServer, serve_connection};

use std::thread::JoinHandle;
use unreal_mcp_core::{Editor, Result};

/// A bound server plus the game thread behind it
pub struct Bridge {
    pub server: TcpServer,
    pub handle: GameThreadHandle,
    pub game_thread: JoinHandle<()>,
}

impl Bridge {
    /// Spawn the game thread with every built-in command and bind the
    /// listener described by `config`.
    pub async fn start<E, F>(config: &BridgeConfig, factory: F) -> Result<Self>
    where
        E: Editor + 'static,
        F: FnOnce() -> E + Send + 'static,
    {
        Self::start_with_router(config, Router::new(), factory).await
    }

    pub async fn start_with_router<E, F>(
        config: &BridgeConfig,
        router: Router,
        factory: F,
    ) -> Result<Self>
    where
        E: Editor + 'static,
        F: FnOnce() -> E + Send + 'static,
    {
        let (handle, game_thread) = GameThread::spawn(config.queue_capacity, router, factory)?;
        let server = TcpServer::bind(
            config.socket_addr(),
            handle.clone(),
            ConnectionSettings::from(config),
        )
        .await?;
        Ok(Self {
            server,
            handle,
            game_thread,
        })
    }
}
