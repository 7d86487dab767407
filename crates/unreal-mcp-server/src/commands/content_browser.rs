//! Content browser queries

use super::{asset_path, parse, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{AssetData, AssetFilter, AssetMetadata, BridgeError, Editor, Params, Result};

pub fn register(router: &mut Router) {
    router.register("list_assets", list_assets);
    router.register("get_asset_metadata", get_asset_metadata);
    router.register("search_assets", search_assets);
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(default)]
    path: String,
    #[serde(default)]
    type_filter: String,
    #[serde(default)]
    recursive: bool,
}

#[derive(Debug, Deserialize)]
struct MetadataParams {
    asset_path: String,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    search_text: String,
    #[serde(default)]
    type_filter: String,
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim().trim_end_matches('/');
    (!value.is_empty()).then(|| value.to_string())
}

fn asset_list(assets: Vec<AssetData>) -> Result<Value> {
    let count = assets.len();
    Ok(json!({ "assets": serde_json::to_value(assets)?, "count": count }))
}

fn list_assets(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ListParams = parse(params)?;
    let filter = AssetFilter {
        package_path: non_empty(&p.path),
        class_name: non_empty(&p.type_filter),
        recursive: p.recursive,
    };
    asset_list(editor.query_assets(&filter))
}

fn get_asset_metadata(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: MetadataParams = parse(params)?;
    let path = asset_path("asset_path", &p.asset_path)?;
    let data = editor
        .find_asset(&path)
        .ok_or_else(|| BridgeError::NotFound(format!("Asset not found: {}", p.asset_path)))?;
    let metadata = AssetMetadata {
        data,
        package_name: path.package_name().to_string(),
        asset_name: path.asset_name().to_string(),
        tags: editor.asset_tags(&path),
    };
    Ok(serde_json::to_value(metadata)?)
}

fn search_assets(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: SearchParams = parse(params)?;
    let needle = required("search_text", &p.search_text)?.to_lowercase();
    let filter = AssetFilter {
        package_path: None,
        class_name: non_empty(&p.type_filter),
        recursive: true,
    };
    let hits = editor
        .query_assets(&filter)
        .into_iter()
        .filter(|a| {
            a.name.to_lowercase().contains(&needle)
                || a.package_path.to_lowercase().contains(&needle)
        })
        .collect();
    asset_list(hits)
}
