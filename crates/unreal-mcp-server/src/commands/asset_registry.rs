//! Reference graph queries

use super::{asset_path, parse};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{AssetPath, BridgeError, Editor, Params, Result};

pub fn register(router: &mut Router) {
    router.register("get_asset_references", get_asset_references);
    router.register("get_asset_dependencies", get_asset_dependencies);
}

#[derive(Debug, Deserialize)]
struct AssetParams {
    asset_path: String,
}

fn existing(editor: &dyn Editor, params: Params) -> Result<AssetPath> {
    let p: AssetParams = parse(params)?;
    let path = asset_path("asset_path", &p.asset_path)?;
    if editor.find_asset(&path).is_none() {
        return Err(BridgeError::NotFound(format!(
            "Asset not found: {}",
            p.asset_path
        )));
    }
    Ok(path)
}

fn get_asset_references(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let path = existing(editor, params)?;
    let referencers = editor.referencers(&path);
    Ok(json!({ "count": referencers.len(), "referencers": referencers }))
}

fn get_asset_dependencies(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let path = existing(editor, params)?;
    let dependencies = editor.dependencies(&path);
    Ok(json!({ "count": dependencies.len(), "dependencies": dependencies }))
}
