//! End-to-end tests: a real listener on an ephemeral port, the simulated
//! editor on its game thread, and the async client.

use serde_json::{Value, json};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use unreal_editor_sim::SimulatedEditor;
use unreal_mcp_client::UnrealMcpClient;
use unreal_mcp_core::{CommandResponse, Editor, Params, Result};
use unreal_mcp_server::{Bridge, BridgeConfig, Router};

fn test_config() -> BridgeConfig {
    BridgeConfig {
        bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        ..BridgeConfig::default()
    }
}

async fn start(router: Router) -> SocketAddr {
    let bridge = Bridge::start_with_router(&test_config(), router, SimulatedEditor::new)
        .await
        .unwrap();
    let addr = bridge.server.local_addr().unwrap();
    tokio::spawn(bridge.server.run());
    addr
}

async fn connect() -> UnrealMcpClient {
    let addr = start(Router::new()).await;
    UnrealMcpClient::connect(addr).await.unwrap()
}

fn explode(_: &mut dyn Editor, _: Params) -> Result<Value> {
    panic!("kaboom");
}

#[tokio::test]
async fn test_known_command_returns_object() {
    let mut client = connect().await;
    let response = client.send_command("get_actors_in_level", json!({})).await.unwrap();
    match response {
        CommandResponse::Success { result } => assert!(result.is_object()),
        other => panic!("unexpected response: {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_command() {
    let mut client = connect().await;
    let response = client.send_command("summon_dragon", json!({})).await.unwrap();
    assert_eq!(response, CommandResponse::error("Unknown command: summon_dragon"));
}

#[tokio::test]
async fn test_missing_parameter_is_repeatable() {
    let mut client = connect().await;
    let before = client.list_assets("/Game").await.unwrap().len();

    for _ in 0..2 {
        let response = client
            .send_command("duplicate_asset", json!({"source_path": "/Engine/BasicShapes/Cube"}))
            .await
            .unwrap();
        assert_eq!(
            response,
            CommandResponse::error("destination_path parameter is required")
        );
    }

    assert_eq!(client.list_assets("/Game").await.unwrap().len(), before);
}

#[tokio::test]
async fn test_save_then_load_keeps_class() {
    let mut client = connect().await;
    client
        .call(
            "duplicate_asset",
            json!({"source_path": "/Engine/BasicShapes/Sphere", "destination_path": "/Game/Props/Ball"}),
        )
        .await
        .unwrap();

    let saved = client
        .call("save_asset", json!({"asset_path": "/Game/Props/Ball"}))
        .await
        .unwrap();
    assert_eq!(saved["saved"], json!(true));

    let loaded = client
        .call("load_asset", json!({"asset_path": "/Game/Props/Ball"}))
        .await
        .unwrap();
    assert_eq!(loaded["class"], json!("StaticMesh"));
}

#[tokio::test]
async fn test_level_info_is_stable() {
    let mut client = connect().await;
    let first = client.current_level_info().await.unwrap();
    let second = client.current_level_info().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_basic_shapes_listed() {
    let mut client = connect().await;
    let assets = client.list_assets("/Engine/BasicShapes").await.unwrap();

    for shape in ["Cube", "Sphere", "Cylinder", "Plane", "Cone"] {
        let asset = assets
            .iter()
            .find(|a| a["name"] == json!(shape))
            .unwrap_or_else(|| panic!("{} missing from {:?}", shape, assets));
        assert_eq!(asset["class"], json!("StaticMesh"));
    }
}

#[tokio::test]
async fn test_delete_missing_asset() {
    let mut client = connect().await;
    let before = client.list_assets("/Game").await.unwrap();

    let reply = client
        .send_raw(br#"{"command":"delete_asset","params":{"asset_path":"/Game/DoesNotExist"}}"#)
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&reply).unwrap(),
        json!({"status": "error", "error": "Failed to delete asset: /Game/DoesNotExist"})
    );

    assert_eq!(client.list_assets("/Game").await.unwrap(), before);
}

#[tokio::test]
async fn test_level_cycle() {
    let mut client = connect().await;
    client
        .call("create_level", json!({"level_name": "TestLevel"}))
        .await
        .unwrap();
    client.call("save_level", json!({})).await.unwrap();
    client
        .call("load_level", json!({"level_path": "/Game/TestLevel"}))
        .await
        .unwrap();

    let info = client.current_level_info().await.unwrap();
    assert_eq!(info["persistent_level"]["name"], json!("TestLevel"));
}

#[tokio::test]
async fn test_malformed_json_keeps_connection() {
    let mut client = connect().await;

    let reply = client.send_raw(b"{\"command\": \"ping\"").await.unwrap();
    match reply {
        CommandResponse::Error { error } => assert!(error.starts_with("Invalid JSON: "), "{}", error),
        other => panic!("unexpected response: {:?}", other),
    }

    client.ping().await.unwrap();
}

#[tokio::test]
async fn test_legacy_type_field() {
    let mut client = connect().await;
    let reply = client.send_raw(br#"{"type":"ping"}"#).await.unwrap();
    assert_eq!(reply, CommandResponse::success(json!({"message": "pong"})));
}

#[tokio::test]
async fn test_handler_panic_is_survivable() {
    let mut router = Router::new();
    router.register("explode", explode);
    let addr = start(router).await;
    let mut client = UnrealMcpClient::connect(addr).await.unwrap();

    let reply = client.send_command("explode", json!({})).await.unwrap();
    assert_eq!(
        reply,
        CommandResponse::error("Command 'explode' panicked: kaboom")
    );

    let info = client.current_level_info().await.unwrap();
    assert!(info["world_name"].is_string());
}

#[tokio::test]
async fn test_next_client_after_disconnect() {
    let addr = start(Router::new()).await;

    let mut first = UnrealMcpClient::connect(addr).await.unwrap();
    first
        .call("create_level", json!({"level_name": "Shared"}))
        .await
        .unwrap();
    drop(first);

    // Editor state outlives the connection.
    let mut second = UnrealMcpClient::connect(addr).await.unwrap();
    let info = second.current_level_info().await.unwrap();
    assert_eq!(info["persistent_level"]["name"], json!("Shared"));
}
