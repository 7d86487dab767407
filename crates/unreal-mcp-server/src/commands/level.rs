//! Persistent and streaming level management

use super::{parse, require_world, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{AssetPath, BridgeError, Editor, LevelInfo, Params, Result};

pub fn register(router: &mut Router) {
    router.register("create_level", create_level);
    router.register("save_level", save_level);
    router.register("load_level", load_level);
    router.register("set_level_visibility", set_level_visibility);
    router.register("create_streaming_level", create_streaming_level);
    router.register("load_streaming_level", load_streaming_level);
    router.register("unload_streaming_level", unload_streaming_level);
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    level_name: String,
}

#[derive(Debug, Deserialize)]
struct SaveParams {
    #[serde(default)]
    level_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PathParams {
    level_path: String,
}

#[derive(Debug, Deserialize)]
struct VisibilityParams {
    level_name: String,
    #[serde(default = "default_visible")]
    visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct NameParams {
    level_name: String,
}

fn is_valid_level_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Validate a `/Game/...` level path and return its package name
fn level_package(value: &str) -> Result<String> {
    let value = required("level_path", value)?;
    if !value.starts_with("/Game/") {
        return Err(BridgeError::invalid(
            "level_path",
            "must be a content path under /Game/",
        ));
    }
    AssetPath::parse(value)
        .map(|p| p.package_name().to_string())
        .map_err(|e| BridgeError::invalid("level_path", e.to_string()))
}

fn is_level(editor: &dyn Editor, package: &str) -> bool {
    AssetPath::parse(package)
        .ok()
        .and_then(|p| editor.find_asset(&p))
        .is_some_and(|a| a.class == "World")
}

fn create_level(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: CreateParams = parse(params)?;
    let name = required("level_name", &p.level_name)?;
    if !is_valid_level_name(name) {
        return Err(BridgeError::invalid(
            "level_name",
            "only letters, digits, '_' and '-' are allowed",
        ));
    }
    let level = editor.new_level(&format!("/Game/{}", name))?;
    Ok(serde_json::to_value(LevelInfo::from(&level))?)
}

fn save_level(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: SaveParams = parse(params)?;
    let world = require_world(editor)?;
    if let Some(raw) = p.level_path.as_deref().filter(|s| !s.trim().is_empty()) {
        let package = level_package(raw)?;
        if !is_level(editor, &package) {
            return Err(BridgeError::NotFound(format!("Level not found: {}", raw)));
        }
        if package != world.persistent_level.package_name {
            return Err(BridgeError::OperationFailed(format!(
                "Level {} is not the current level",
                raw
            )));
        }
    }

    let map = editor.save_current_level()?;
    Ok(json!({
        "message": format!("Level saved: {}", map),
        "level_name": map,
    }))
}

fn load_level(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PathParams = parse(params)?;
    let package = level_package(&p.level_path)?;
    editor.open_level(&package)?;
    Ok(json!({
        "message": format!("Level loaded: {}", p.level_path),
        "level_path": p.level_path,
    }))
}

fn set_level_visibility(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: VisibilityParams = parse(params)?;
    let name = required("level_name", &p.level_name)?;
    require_world(editor)?;
    editor.set_streaming_level_visible(name, p.visible)?;
    Ok(json!({
        "message": format!(
            "Set level {} visibility to {}",
            name,
            if p.visible { "visible" } else { "hidden" }
        ),
        "level_name": name,
        "visible": p.visible,
    }))
}

fn create_streaming_level(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PathParams = parse(params)?;
    let package = level_package(&p.level_path)?;
    require_world(editor)?;
    editor.add_streaming_level(&package)?;
    Ok(json!({
        "message": format!("Created streaming level: {}", p.level_path),
        "level_path": p.level_path,
    }))
}

fn load_streaming_level(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: NameParams = parse(params)?;
    let name = required("level_name", &p.level_name)?;
    require_world(editor)?;
    editor.set_streaming_level_loaded(name, true)?;
    Ok(json!({
        "message": format!("Loaded streaming level: {}", name),
        "level_name": name,
    }))
}

fn unload_streaming_level(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: NameParams = parse(params)?;
    let name = required("level_name", &p.level_name)?;
    require_world(editor)?;
    editor.set_streaming_level_loaded(name, false)?;
    Ok(json!({
        "message": format!("Unloaded streaming level: {}", name),
        "level_name": name,
    }))
}
