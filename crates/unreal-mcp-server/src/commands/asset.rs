//! Asset lifecycle commands

use super::{asset_path, parse, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use unreal_mcp_core::{BridgeError, Editor, Params, Result};

pub fn register(router: &mut Router) {
    router.register("load_asset", load_asset);
    router.register("save_asset", save_asset);
    router.register("duplicate_asset", duplicate_asset);
    router.register("delete_asset", delete_asset);
    router.register("rename_asset", rename_asset);
    router.register("move_asset", move_asset);
    router.register("import_asset", import_asset);
    router.register("export_asset", export_asset);
}

#[derive(Debug, Deserialize)]
struct AssetParams {
    asset_path: String,
}

#[derive(Debug, Deserialize)]
struct SaveParams {
    asset_path: String,
    #[serde(default = "default_true")]
    only_if_dirty: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct CopyParams {
    source_path: String,
    destination_path: String,
}

#[derive(Debug, Deserialize)]
struct RenameParams {
    source_path: String,
    new_name: String,
}

#[derive(Debug, Deserialize)]
struct ImportParams {
    file_path: String,
    destination_path: String,
}

#[derive(Debug, Deserialize)]
struct ExportParams {
    asset_path: String,
    export_path: String,
}

fn load_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: AssetParams = parse(params)?;
    let path = asset_path("asset_path", &p.asset_path)?;
    let asset = editor
        .load_asset(&path)
        .ok_or_else(|| BridgeError::NotFound(format!("Failed to load asset: {}", p.asset_path)))?;
    Ok(json!({
        "asset_path": p.asset_path,
        "loaded": true,
        "class": asset.class,
    }))
}

fn save_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: SaveParams = parse(params)?;
    let path = asset_path("asset_path", &p.asset_path)?;
    if !editor.save_asset(&path, p.only_if_dirty) {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to save asset: {}",
            p.asset_path
        )));
    }
    Ok(json!({ "asset_path": p.asset_path, "saved": true }))
}

fn duplicate_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: CopyParams = parse(params)?;
    let source = asset_path("source_path", &p.source_path)?;
    let destination = asset_path("destination_path", &p.destination_path)?;
    if editor.duplicate_asset(&source, &destination).is_none() {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to duplicate asset from {} to {}",
            p.source_path, p.destination_path
        )));
    }
    Ok(json!({
        "source": p.source_path,
        "destination": p.destination_path,
        "duplicated": true,
    }))
}

fn delete_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: AssetParams = parse(params)?;
    let path = asset_path("asset_path", &p.asset_path)?;
    if !editor.delete_asset(&path) {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to delete asset: {}",
            p.asset_path
        )));
    }
    Ok(json!({ "asset_path": p.asset_path, "deleted": true }))
}

fn rename_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: RenameParams = parse(params)?;
    let source = asset_path("source_path", &p.source_path)?;
    let new_name = required("new_name", &p.new_name)?;
    if new_name.contains(['/', '.']) {
        return Err(BridgeError::invalid(
            "new_name",
            "must be a bare asset name without '/' or '.'",
        ));
    }
    let destination = source
        .with_name(new_name)
        .map_err(|e| BridgeError::invalid("new_name", e.to_string()))?;

    if !editor.rename_asset(&source, &destination) {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to rename asset from {} to {}",
            p.source_path, new_name
        )));
    }
    Ok(json!({
        "old_path": p.source_path,
        "new_path": destination.package_name(),
    }))
}

fn move_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: CopyParams = parse(params)?;
    let source = asset_path("source_path", &p.source_path)?;
    let destination = asset_path("destination_path", &p.destination_path)?;
    if !editor.rename_asset(&source, &destination) {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to move asset from {} to {}",
            p.source_path, p.destination_path
        )));
    }
    Ok(json!({
        "source": p.source_path,
        "destination": p.destination_path,
        "moved": true,
    }))
}

fn import_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ImportParams = parse(params)?;
    let file_path = required("file_path", &p.file_path)?;
    let destination = required("destination_path", &p.destination_path)?;
    if !destination.starts_with('/') {
        return Err(BridgeError::invalid(
            "destination_path",
            "must be a content path such as /Game/Imported",
        ));
    }

    let imported = editor.import_asset(Path::new(file_path), destination);
    if imported.is_empty() {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to import asset from {}",
            file_path
        )));
    }
    let assets: Vec<Value> = imported
        .iter()
        .map(|a| json!({ "name": a.name, "class": a.class, "path": a.path }))
        .collect();
    Ok(json!({ "imported_assets": assets, "count": assets.len() }))
}

fn export_asset(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ExportParams = parse(params)?;
    let path = asset_path("asset_path", &p.asset_path)?;
    let export_path = required("export_path", &p.export_path)?;
    if editor.find_asset(&path).is_none() {
        return Err(BridgeError::NotFound(format!(
            "Asset not found: {}",
            p.asset_path
        )));
    }
    if !editor.export_asset(&path, Path::new(export_path)) {
        return Err(BridgeError::OperationFailed(format!(
            "Failed to export asset {} to {}",
            p.asset_path, export_path
        )));
    }
    Ok(json!({ "asset_path": p.asset_path, "export_path": export_path }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests_support::{call, call_err};
    use unreal_editor_sim::SimulatedEditor;

    #[test]
    fn test_load_and_save() {
        let mut editor = SimulatedEditor::new();
        let loaded = call(
            &mut editor,
            load_asset,
            json!({"asset_path": "/Engine/BasicShapes/Cube"}),
        );
        assert_eq!(loaded["class"], json!("StaticMesh"));
        assert_eq!(loaded["loaded"], json!(true));

        call(
            &mut editor,
            duplicate_asset,
            json!({"source_path": "/Engine/BasicShapes/Cube", "destination_path": "/Game/Cube2"}),
        );
        let saved = call(&mut editor, save_asset, json!({"asset_path": "/Game/Cube2"}));
        assert_eq!(saved, json!({"asset_path": "/Game/Cube2", "saved": true}));
        let reloaded = call(&mut editor, load_asset, json!({"asset_path": "/Game/Cube2"}));
        assert_eq!(reloaded["class"], loaded["class"]);
    }

    #[test]
    fn test_missing_asset_errors() {
        let mut editor = SimulatedEditor::new();
        assert_eq!(
            call_err(&mut editor, load_asset, json!({"asset_path": "/Game/Nope"})),
            "Failed to load asset: /Game/Nope"
        );
        let before = editor.asset_count();
        assert_eq!(
            call_err(&mut editor, delete_asset, json!({"asset_path": "/Game/Nope"})),
            "Failed to delete asset: /Game/Nope"
        );
        assert_eq!(editor.asset_count(), before);
    }

    #[test]
    fn test_missing_parameter_leaves_registry_alone() {
        let mut editor = SimulatedEditor::new();
        let before = editor.asset_count();
        for _ in 0..2 {
            assert_eq!(
                call_err(&mut editor, duplicate_asset, json!({"source_path": "/Engine/BasicShapes/Cube"})),
                "destination_path parameter is required"
            );
        }
        assert_eq!(editor.asset_count(), before);
    }

    #[test]
    fn test_rename_and_move() {
        let mut editor = SimulatedEditor::new();
        call(
            &mut editor,
            duplicate_asset,
            json!({"source_path": "/Engine/BasicShapes/Cone", "destination_path": "/Game/Props/Cone"}),
        );
        let renamed = call(
            &mut editor,
            rename_asset,
            json!({"source_path": "/Game/Props/Cone", "new_name": "TrafficCone"}),
        );
        assert_eq!(renamed["new_path"], json!("/Game/Props/TrafficCone"));

        let moved = call(
            &mut editor,
            move_asset,
            json!({"source_path": "/Game/Props/TrafficCone", "destination_path": "/Game/Street/TrafficCone"}),
        );
        assert_eq!(moved["moved"], json!(true));

        assert_eq!(
            call_err(
                &mut editor,
                rename_asset,
                json!({"source_path": "/Game/Street/TrafficCone", "new_name": "a/b"})
            ),
            "Invalid new_name parameter: must be a bare asset name without '/' or '.'"
        );
    }

    #[test]
    fn test_import_export() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Boulder.obj");
        std::fs::write(&file, b"v 0 0 0").unwrap();
        let mut editor = SimulatedEditor::new();

        let imported = call(
            &mut editor,
            import_asset,
            json!({"file_path": file.to_str().unwrap(), "destination_path": "/Game/Rocks"}),
        );
        assert_eq!(imported["count"], json!(1));
        assert_eq!(imported["imported_assets"][0]["path"], json!("/Game/Rocks/Boulder.Boulder"));

        let out = dir.path().join("out");
        let exported = call(
            &mut editor,
            export_asset,
            json!({"asset_path": "/Game/Rocks/Boulder", "export_path": out.to_str().unwrap()}),
        );
        assert_eq!(exported["asset_path"], json!("/Game/Rocks/Boulder"));

        assert_eq!(
            call_err(
                &mut editor,
                export_asset,
                json!({"asset_path": "/Game/Rocks/Pebble", "export_path": out.to_str().unwrap()})
            ),
            "Asset not found: /Game/Rocks/Pebble"
        );
        assert_eq!(
            call_err(
                &mut editor,
                import_asset,
                json!({"file_path": "/no/such/file.fbx", "destination_path": "/Game"})
            ),
            "Failed to import asset from /no/such/file.fbx"
        );
    }

    #[test]
    fn test_invalid_path() {
        let mut editor = SimulatedEditor::new();
        assert_eq!(
            call_err(&mut editor, load_asset, json!({"asset_path": "Cube"})),
            "Invalid asset_path parameter: path must start with '/'"
        );
    }
}
