//! Actor placement and viewport commands

use super::{parse, require_world, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use unreal_mcp_core::{
    ActorInfo, ActorSpawn, BridgeError, Editor, Params, Result, Rotator, Transform,
    TransformUpdate, Vector3,
};

pub fn register(router: &mut Router) {
    router.register("get_actors_in_level", get_actors_in_level);
    router.register("find_actors_by_name", find_actors_by_name);
    router.register("spawn_actor", spawn_actor);
    router.register("create_actor", spawn_actor);
    router.register("delete_actor", delete_actor);
    router.register("set_actor_transform", set_actor_transform);
    router.register("get_actor_properties", get_actor_properties);
    router.register("set_actor_property", set_actor_property);
    router.register("spawn_blueprint_actor", spawn_blueprint_actor);
    router.register("focus_viewport", focus_viewport);
    router.register("take_screenshot", take_screenshot);
}

/// Actor classes `spawn_actor` can place directly
const SPAWNABLE_TYPES: &[&str] = &[
    "StaticMeshActor",
    "PointLight",
    "SpotLight",
    "DirectionalLight",
    "CameraActor",
];

const DEFAULT_FOCUS_DISTANCE: f64 = 1000.0;

fn default_scale() -> Vector3 {
    Vector3::ONE
}

#[derive(Debug, Deserialize)]
struct SpawnParams {
    name: String,
    #[serde(rename = "type")]
    actor_type: String,
    #[serde(default)]
    location: Vector3,
    #[serde(default)]
    rotation: Rotator,
    #[serde(default = "default_scale")]
    scale: Vector3,
}

#[derive(Debug, Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PatternParams {
    pattern: String,
}

#[derive(Debug, Deserialize)]
struct TransformParams {
    name: String,
    location: Option<Vector3>,
    rotation: Option<Rotator>,
    scale: Option<Vector3>,
}

#[derive(Debug, Deserialize)]
struct PropertyParams {
    name: String,
    property_name: String,
    property_value: Value,
}

#[derive(Debug, Deserialize)]
struct BlueprintSpawnParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    actor_name: String,
    #[serde(default)]
    location: Vector3,
    #[serde(default)]
    rotation: Rotator,
    #[serde(default = "default_scale")]
    scale: Vector3,
}

#[derive(Debug, Deserialize)]
struct FocusParams {
    target: Option<String>,
    location: Option<Vector3>,
    distance: Option<f64>,
    orientation: Option<Rotator>,
}

#[derive(Debug, Deserialize)]
struct ScreenshotParams {
    filepath: String,
}

fn actor_not_found(name: &str) -> BridgeError {
    BridgeError::NotFound(format!("Actor not found: {}", name))
}

/// ActorInfo with the actor's editable properties attached
fn actor_details(editor: &dyn Editor, actor: &ActorInfo) -> Result<Value> {
    let mut value = serde_json::to_value(actor)?;
    if let (Value::Object(map), Some(props)) = (&mut value, editor.actor_properties(&actor.name)) {
        map.insert("properties".to_string(), Value::Object(props));
    }
    Ok(value)
}

fn find_actor(editor: &dyn Editor, name: &str) -> Result<ActorInfo> {
    editor
        .level_actors()
        .into_iter()
        .find(|a| a.name == name)
        .ok_or_else(|| actor_not_found(name))
}

fn get_actors_in_level(editor: &mut dyn Editor, _params: Params) -> Result<Value> {
    require_world(editor)?;
    Ok(json!({ "actors": editor.level_actors() }))
}

fn find_actors_by_name(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PatternParams = parse(params)?;
    let pattern = required("pattern", &p.pattern)?.to_lowercase();
    require_world(editor)?;
    let actors: Vec<ActorInfo> = editor
        .level_actors()
        .into_iter()
        .filter(|a| a.name.to_lowercase().contains(&pattern))
        .collect();
    Ok(json!({ "actors": actors }))
}

fn spawn_actor(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: SpawnParams = parse(params)?;
    let name = required("name", &p.name)?;
    let actor_type = required("type", &p.actor_type)?;
    if !SPAWNABLE_TYPES.contains(&actor_type) {
        return Err(BridgeError::OperationFailed(format!(
            "Unknown actor type: {}",
            actor_type
        )));
    }
    require_world(editor)?;
    let actor = editor.spawn_actor(ActorSpawn {
        name: name.to_string(),
        class: actor_type.to_string(),
        transform: Transform {
            location: p.location,
            rotation: p.rotation,
            scale: p.scale,
        },
    })?;
    Ok(serde_json::to_value(actor)?)
}

fn delete_actor(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: NameParams = parse(params)?;
    let name = required("name", &p.name)?;
    require_world(editor)?;
    let actor = editor.destroy_actor(name).ok_or_else(|| actor_not_found(name))?;
    Ok(json!({ "deleted_actor": actor }))
}

fn set_actor_transform(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: TransformParams = parse(params)?;
    let name = required("name", &p.name)?;
    require_world(editor)?;
    let update = TransformUpdate {
        location: p.location,
        rotation: p.rotation,
        scale: p.scale,
    };
    let actor = editor
        .set_actor_transform(name, update)
        .ok_or_else(|| actor_not_found(name))?;
    Ok(serde_json::to_value(actor)?)
}

fn get_actor_properties(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: NameParams = parse(params)?;
    let name = required("name", &p.name)?;
    require_world(editor)?;
    let actor = find_actor(editor, name)?;
    actor_details(editor, &actor)
}

fn set_actor_property(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PropertyParams = parse(params)?;
    let name = required("name", &p.name)?;
    let property = required("property_name", &p.property_name)?;
    require_world(editor)?;
    editor.set_actor_property(name, property, p.property_value)?;
    let actor = find_actor(editor, name)?;
    Ok(json!({
        "actor": name,
        "property": property,
        "success": true,
        "actor_details": actor_details(editor, &actor)?,
    }))
}

fn spawn_blueprint_actor(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: BlueprintSpawnParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let actor_name = required("actor_name", &p.actor_name)?;
    require_world(editor)?;
    let info = editor
        .find_blueprint(blueprint)
        .ok_or_else(|| BridgeError::NotFound(format!("Blueprint not found: {}", blueprint)))?;
    let actor = editor.spawn_actor(ActorSpawn {
        name: actor_name.to_string(),
        class: info.generated_class(),
        transform: Transform {
            location: p.location,
            rotation: p.rotation,
            scale: p.scale,
        },
    })?;
    Ok(serde_json::to_value(actor)?)
}

fn focus_viewport(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: FocusParams = parse(params)?;
    let distance = p.distance.unwrap_or(DEFAULT_FOCUS_DISTANCE);
    if !distance.is_finite() || distance < 0.0 {
        return Err(BridgeError::invalid("distance", "must be a non-negative number"));
    }
    require_world(editor)?;

    let location = match (p.target.as_deref().map(str::trim), p.location) {
        (Some(target), _) if !target.is_empty() => find_actor(editor, target)?.location,
        (_, Some(location)) => location,
        _ => {
            return Err(BridgeError::InvalidParameters(
                "either target or location must be provided".to_string(),
            ));
        }
    };
    editor.focus_viewport(location, distance, p.orientation);
    Ok(json!({
        "focused": true,
        "location": location.to_array(),
        "distance": distance,
    }))
}

fn take_screenshot(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ScreenshotParams = parse(params)?;
    let mut path = PathBuf::from(required("filepath", &p.filepath)?);
    if path.extension().is_none() {
        path.set_extension("png");
    }
    editor.take_screenshot(&path)?;
    Ok(json!({ "filepath": path.to_string_lossy() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests_support::{call, call_err};
    use unreal_editor_sim::SimulatedEditor;

    #[test]
    fn test_spawn_and_query() {
        let mut editor = SimulatedEditor::new();
        let actor = call(
            &mut editor,
            spawn_actor,
            json!({"name": "Lamp", "type": "PointLight", "location": [10, 20, 30]}),
        );
        assert_eq!(actor["location"], json!([10.0, 20.0, 30.0]));
        assert_eq!(actor["scale"], json!([1.0, 1.0, 1.0]));

        let found = call(&mut editor, find_actors_by_name, json!({"pattern": "lam"}));
        assert_eq!(found["actors"].as_array().unwrap().len(), 1);

        let all = call(&mut editor, get_actors_in_level, json!({}));
        assert_eq!(all["actors"].as_array().unwrap().len(), 3);

        assert_eq!(
            call_err(&mut editor, spawn_actor, json!({"name": "Lamp", "type": "SpotLight"})),
            "Actor with name 'Lamp' already exists"
        );
        assert_eq!(
            call_err(&mut editor, spawn_actor, json!({"name": "X", "type": "Pawn"})),
            "Unknown actor type: Pawn"
        );
    }

    #[test]
    fn test_transform_and_delete() {
        let mut editor = SimulatedEditor::new();
        call(&mut editor, spawn_actor, json!({"name": "Cam", "type": "CameraActor"}));
        let moved = call(
            &mut editor,
            set_actor_transform,
            json!({"name": "Cam", "rotation": {"pitch": 0, "yaw": 90, "roll": 0}}),
        );
        assert_eq!(moved["rotation"], json!([0.0, 90.0, 0.0]));
        assert_eq!(moved["location"], json!([0.0, 0.0, 0.0]));

        let deleted = call(&mut editor, delete_actor, json!({"name": "Cam"}));
        assert_eq!(deleted["deleted_actor"]["name"], json!("Cam"));
        assert_eq!(
            call_err(&mut editor, delete_actor, json!({"name": "Cam"})),
            "Actor not found: Cam"
        );
    }

    #[test]
    fn test_properties() {
        let mut editor = SimulatedEditor::new();
        let props = call(&mut editor, get_actor_properties, json!({"name": "Floor"}));
        assert_eq!(props["properties"]["StaticMesh"], json!("/Engine/BasicShapes/Plane"));

        let updated = call(
            &mut editor,
            set_actor_property,
            json!({"name": "DirectionalLight", "property_name": "Intensity", "property_value": 3.5}),
        );
        assert_eq!(updated["success"], json!(true));
        assert_eq!(updated["actor_details"]["properties"]["Intensity"], json!(3.5));

        assert_eq!(
            call_err(
                &mut editor,
                set_actor_property,
                json!({"name": "Floor", "property_name": "Wobble", "property_value": 1})
            ),
            "Property 'Wobble' not found on actor 'Floor'"
        );
    }

    #[test]
    fn test_spawn_blueprint_actor() {
        use unreal_mcp_core::BlueprintEditor;
        let mut editor = SimulatedEditor::new();
        editor
            .create_blueprint("BP_Crate", "/Game/Blueprints", "Actor")
            .unwrap();
        let actor = call(
            &mut editor,
            spawn_blueprint_actor,
            json!({"blueprint_name": "BP_Crate", "actor_name": "Crate1"}),
        );
        assert_eq!(actor["class"], json!("BP_Crate_C"));
        assert_eq!(
            call_err(
                &mut editor,
                spawn_blueprint_actor,
                json!({"blueprint_path": "BP_Missing", "actor_name": "X"})
            ),
            "Blueprint not found: BP_Missing"
        );
    }

    #[test]
    fn test_focus_viewport() {
        let mut editor = SimulatedEditor::new();
        let focused = call(&mut editor, focus_viewport, json!({"target": "DirectionalLight"}));
        assert_eq!(focused["location"], json!([0.0, 0.0, 1000.0]));
        assert_eq!(focused["distance"], json!(1000.0));

        call(
            &mut editor,
            focus_viewport,
            json!({"location": [0, 0, 0], "distance": 500, "orientation": [0, 0, 0]}),
        );
        let camera = editor.viewport_camera();
        assert!((camera.location.x + 500.0).abs() < 1e-6);

        assert_eq!(
            call_err(&mut editor, focus_viewport, json!({})),
            "Invalid parameters: either target or location must be provided"
        );
    }

    #[test]
    fn test_screenshot_adds_extension() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shots").join("frame");
        let mut editor = SimulatedEditor::new();
        let result = call(
            &mut editor,
            take_screenshot,
            json!({"filepath": target.to_str().unwrap()}),
        );
        let written = PathBuf::from(result["filepath"].as_str().unwrap());
        assert_eq!(written.extension().unwrap(), "png");
        assert!(written.exists());
    }
}
