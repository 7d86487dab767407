//! Unreal MCP bridge server
//!
//! Runs the TCP command bridge against the in-memory editor:
//! - `unreal-mcp-server [-UnrealMCPPort=55557] [-UnrealMCPBind=0.0.0.0] ...`
//! - `unreal-mcp-server --send <command> [params-json]` sends one command to
//!   a running bridge and prints the reply

mod logging;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tracing::{error, info};
use unreal_editor_sim::SimulatedEditor;
use unreal_mcp_client::UnrealMcpClient;
use unreal_mcp_server::{Bridge, BridgeConfig};

struct SendRequest {
    command: String,
    params: Value,
}

/// `--send <command> [params-json]`, if present
fn parse_send(args: &[String]) -> Result<Option<SendRequest>> {
    let Some(pos) = args.iter().position(|a| a == "--send") else {
        return Ok(None);
    };
    let command = args
        .get(pos + 1)
        .filter(|c| !c.starts_with('-'))
        .ok_or_else(|| anyhow!("--send needs a command name"))?
        .clone();
    let params = match args.get(pos + 2).filter(|p| !p.starts_with('-')) {
        Some(raw) => serde_json::from_str(raw).context("params must be JSON")?,
        None => Value::Object(Default::default()),
    };
    if !params.is_object() {
        bail!("params must be a JSON object");
    }
    Ok(Some(SendRequest { command, params }))
}

/// Where a local client should connect to reach the configured listener
fn client_addr(config: &BridgeConfig) -> SocketAddr {
    let ip = if config.bind_address.is_unspecified() {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    } else {
        config.bind_address
    };
    SocketAddr::new(ip, config.port)
}

async fn send(config: &BridgeConfig, request: SendRequest) -> Result<()> {
    let addr = client_addr(config);
    let mut client = UnrealMcpClient::connect(addr)
        .await
        .with_context(|| format!("No bridge listening on {}", addr))?;
    let response = client.send_command(&request.command, request.params).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn serve(config: &BridgeConfig) -> Result<()> {
    let Bridge {
        server,
        handle,
        game_thread,
    } = Bridge::start(config, SimulatedEditor::new).await?;

    server.run_until(shutdown_signal()).await?;

    // The game thread exits once the last handle is gone.
    drop(handle);
    tokio::task::spawn_blocking(move || game_thread.join())
        .await?
        .map_err(|_| anyhow!("Game thread panicked"))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = BridgeConfig::from_sources(args.iter().cloned(), |key| std::env::var(key).ok())
        .context("Invalid configuration")?;
    let send_request = parse_send(&args)?;

    logging::init(&config)?;

    match send_request {
        Some(request) => send(&config, request).await,
        None => {
            info!("Unreal MCP bridge starting");
            serve(&config).await
        }
    }
}
