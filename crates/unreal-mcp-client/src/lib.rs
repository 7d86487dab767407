//! Unreal MCP client
//!
//! Async client for the editor bridge. One request is in flight at a time;
//! each call writes a line and waits for the matching reply line.

use serde_json::{Map, Value, json};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;
use unreal_mcp_core::{BridgeError, CommandRequest, CommandResponse, Result};
use unreal_mcp_wire::tcp::{TcpReadWrapper, TcpWriteWrapper, split};
use unreal_mcp_wire::{AsyncReader, AsyncWriter, DEFAULT_MAX_FRAME_BYTES, decode_response, encode, preview};

/// Client for a running bridge
pub struct UnrealMcpClient {
    reader: TcpReadWrapper,
    writer: TcpWriteWrapper,
}

impl UnrealMcpClient {
    /// Connect to a bridge, e.g. `"127.0.0.1:55557"`
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| BridgeError::Io(format!("Failed to connect: {}", e)))?;
        let (reader, writer) = split(stream, DEFAULT_MAX_FRAME_BYTES);
        Ok(Self { reader, writer })
    }

    /// Send one command and return the raw envelope
    pub async fn send_command(&mut self, command: &str, params: Value) -> Result<CommandResponse> {
        let params = match params {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(BridgeError::InvalidParameters(format!(
                    "params must be a JSON object, got {}",
                    other
                )));
            }
        };
        let data = encode(&CommandRequest::new(command, params))?;
        self.send_raw(&data).await
    }

    /// Write one frame as-is and read the reply. Useful for probing how the
    /// bridge handles bad input.
    pub async fn send_raw(&mut self, frame: &[u8]) -> Result<CommandResponse> {
        debug!("Sending: {}", preview(frame));
        self.writer.write_message(frame).await?;

        let reply = self
            .reader
            .read_message()
            .await?
            .ok_or(BridgeError::ConnectionClosed)?;
        debug!("Received: {}", preview(&reply));
        decode_response(&reply)
    }

    /// Send a command and unwrap the envelope into its result object
    pub async fn call(&mut self, command: &str, params: Value) -> Result<Value> {
        self.send_command(command, params).await?.into_result()
    }

    pub async fn ping(&mut self) -> Result<()> {
        self.call("ping", json!({})).await.map(|_| ())
    }

    pub async fn current_level_info(&mut self) -> Result<Value> {
        self.call("get_current_level_info", json!({})).await
    }

    /// Asset records under a content path
    pub async fn list_assets(&mut self, path: &str) -> Result<Vec<Value>> {
        let result = self.call("list_assets", json!({ "path": path })).await?;
        match result.get("assets") {
            Some(Value::Array(assets)) => Ok(assets.clone()),
            _ => Err(BridgeError::InvalidRequest(
                "list_assets reply has no assets array".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Answers each line with a canned reply
    async fn fake_bridge(replies: Vec<&'static str>) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read_half, mut write_half) = stream.into_split();
            let mut lines = BufReader::new(read_half).lines();
            for reply in replies {
                if lines.next_line().await.unwrap().is_none() {
                    break;
                }
                write_half.write_all(reply.as_bytes()).await.unwrap();
                write_half.write_all(b"\n").await.unwrap();
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_call_unwraps_result() {
        let addr = fake_bridge(vec![
            r#"{"status":"success","result":{"message":"pong"}}"#,
            r#"{"status":"error","error":"Unknown command: nope"}"#,
        ])
        .await;
        let mut client = UnrealMcpClient::connect(addr).await.unwrap();

        client.ping().await.unwrap();
        let err = client.call("nope", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: nope");
    }

    #[tokio::test]
    async fn test_closed_connection() {
        let addr = fake_bridge(vec![]).await;
        let mut client = UnrealMcpClient::connect(addr).await.unwrap();
        let err = client.send_command("ping", Value::Null).await.unwrap_err();
        assert!(matches!(err, BridgeError::ConnectionClosed | BridgeError::Io(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_object_params() {
        let addr = fake_bridge(vec![]).await;
        let mut client = UnrealMcpClient::connect(addr).await.unwrap();
        let err = client.send_command("ping", json!([1])).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidParameters(_)));
    }
}
