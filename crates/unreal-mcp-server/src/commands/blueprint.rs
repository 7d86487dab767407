//! Blueprint class authoring

use super::{asset_path, parse, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;
use unreal_mcp_core::{
    BlueprintInfo, BridgeError, CompileStatus, ComponentInfo, Editor, Params, Result, Rotator,
    Transform, Vector3, blueprint::is_primitive_component,
};

pub fn register(router: &mut Router) {
    router.register("create_blueprint", create_blueprint);
    router.register("add_component_to_blueprint", add_component_to_blueprint);
    router.register("set_component_property", set_component_property);
    router.register("set_physics_properties", set_physics_properties);
    router.register("compile_blueprint", compile_blueprint);
    router.register("set_blueprint_property", set_blueprint_property);
    router.register("set_static_mesh_properties", set_static_mesh_properties);
    router.register("set_pawn_properties", set_pawn_properties);
}

/// Parent classes a new Blueprint may derive from
const PARENT_CLASSES: &[&str] = &[
    "Actor",
    "Pawn",
    "Character",
    "DefaultPawn",
    "SpectatorPawn",
    "PlayerController",
    "GameModeBase",
    "GameStateBase",
    "PlayerState",
    "HUD",
    "ActorComponent",
    "SceneComponent",
];

const DEFAULT_PARENT_CLASS: &str = "Actor";
const DEFAULT_BLUEPRINT_DIR: &str = "/Game/Blueprints";

/// Blueprint lookup shared by the class and graph commands
pub(crate) fn require_blueprint(editor: &dyn Editor, blueprint: &str) -> Result<BlueprintInfo> {
    editor
        .find_blueprint(blueprint)
        .ok_or_else(|| BridgeError::NotFound(format!("Blueprint not found: {}", blueprint)))
}

/// Match a requested parent class against the known classes, ignoring an
/// `A`/`U` prefix. Unknown classes fall back to `Actor`.
fn resolve_parent_class(requested: &str) -> &'static str {
    let requested = requested.trim();
    let unprefixed = match requested.strip_prefix(['A', 'U']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
        _ => requested,
    };
    PARENT_CLASSES
        .iter()
        .find(|c| c.eq_ignore_ascii_case(unprefixed))
        .copied()
        .unwrap_or_else(|| {
            debug!("Unknown parent class '{}', using {}", requested, DEFAULT_PARENT_CLASS);
            DEFAULT_PARENT_CLASS
        })
}

fn default_parent() -> String {
    DEFAULT_PARENT_CLASS.to_string()
}

fn default_dir() -> String {
    DEFAULT_BLUEPRINT_DIR.to_string()
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    name: String,
    #[serde(default = "default_parent")]
    parent_class: String,
    #[serde(default = "default_dir")]
    path: String,
}

#[derive(Debug, Deserialize)]
struct ComponentParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    component_type: String,
    component_name: String,
    location: Option<Vector3>,
    rotation: Option<Rotator>,
    scale: Option<Vector3>,
    #[serde(default)]
    component_properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ComponentPropertyParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    component_name: String,
    property_name: String,
    property_value: Value,
}

#[derive(Debug, Deserialize)]
struct PhysicsParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    component_name: String,
    #[serde(default = "yes")]
    simulate_physics: bool,
    #[serde(default = "yes")]
    gravity_enabled: bool,
    #[serde(default = "default_mass")]
    mass: f64,
    #[serde(default = "default_linear_damping")]
    linear_damping: f64,
    #[serde(default)]
    angular_damping: f64,
}

fn yes() -> bool {
    true
}

fn default_mass() -> f64 {
    1.0
}

fn default_linear_damping() -> f64 {
    0.01
}

#[derive(Debug, Deserialize)]
struct BlueprintParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
}

#[derive(Debug, Deserialize)]
struct DefaultPropertyParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    property_name: String,
    property_value: Value,
}

#[derive(Debug, Deserialize)]
struct StaticMeshParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    component_name: String,
    static_mesh: String,
    material: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PawnParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    auto_possess_player: Option<String>,
    use_controller_rotation_yaw: Option<bool>,
    use_controller_rotation_pitch: Option<bool>,
    use_controller_rotation_roll: Option<bool>,
    can_be_damaged: Option<bool>,
}

fn create_blueprint(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: CreateParams = parse(params)?;
    let name = required("name", &p.name)?;
    if name.contains(['/', '.']) {
        return Err(BridgeError::invalid("name", "must not contain '/' or '.'"));
    }
    let dir = required("path", &p.path)?;
    let parent = resolve_parent_class(&p.parent_class);

    let info = editor.create_blueprint(name, dir, parent)?;
    Ok(json!({
        "name": info.name,
        "path": info.path,
        "parent_class": info.parent_class,
    }))
}

fn add_component_to_blueprint(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ComponentParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let name = required("component_name", &p.component_name)?;
    let raw_type = required("component_type", &p.component_type)?;
    let component_type = if raw_type.ends_with("Component") {
        raw_type.to_string()
    } else {
        format!("{}Component", raw_type)
    };

    let transform = Transform {
        location: p.location.unwrap_or_default(),
        rotation: p.rotation.unwrap_or_default(),
        scale: p.scale.unwrap_or(Vector3::ONE),
    };
    editor.add_component(
        blueprint,
        ComponentInfo {
            name: name.to_string(),
            component_type: component_type.clone(),
            transform,
            properties: p.component_properties,
        },
    )?;
    Ok(json!({
        "blueprint_name": blueprint,
        "component_name": name,
        "component_type": component_type,
    }))
}

fn set_component_property(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ComponentPropertyParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let component = required("component_name", &p.component_name)?;
    let property = required("property_name", &p.property_name)?;
    editor.set_component_property(blueprint, component, property, p.property_value)?;
    Ok(json!({
        "blueprint_name": blueprint,
        "component_name": component,
        "property_name": property,
        "success": true,
    }))
}

fn set_physics_properties(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PhysicsParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let component = required("component_name", &p.component_name)?;
    for (name, value) in [
        ("mass", p.mass),
        ("linear_damping", p.linear_damping),
        ("angular_damping", p.angular_damping),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(BridgeError::invalid(name, "must be a non-negative number"));
        }
    }

    let info = require_blueprint(editor, blueprint)?;
    let comp = info
        .component(component)
        .ok_or_else(|| BridgeError::NotFound(format!("Component not found: {}", component)))?;
    if !is_primitive_component(&comp.component_type) {
        return Err(BridgeError::OperationFailed(format!(
            "Component '{}' is a {}, not a primitive component",
            component, comp.component_type
        )));
    }

    for (property, value) in [
        ("bSimulatePhysics", json!(p.simulate_physics)),
        ("bEnableGravity", json!(p.gravity_enabled)),
        ("MassInKg", json!(p.mass)),
        ("LinearDamping", json!(p.linear_damping)),
        ("AngularDamping", json!(p.angular_damping)),
    ] {
        editor.set_component_property(blueprint, component, property, value)?;
    }
    Ok(json!({
        "blueprint_name": blueprint,
        "component_name": component,
        "simulate_physics": p.simulate_physics,
        "gravity_enabled": p.gravity_enabled,
        "mass": p.mass,
        "linear_damping": p.linear_damping,
        "angular_damping": p.angular_damping,
    }))
}

fn compile_blueprint(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: BlueprintParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let info = require_blueprint(editor, blueprint)?;
    let status = editor.compile_blueprint(blueprint)?;
    if status == CompileStatus::Error {
        return Err(BridgeError::OperationFailed(format!(
            "Blueprint compilation failed: {}",
            info.name
        )));
    }
    Ok(json!({
        "name": info.name,
        "compiled": true,
        "status": status.to_string(),
    }))
}

fn set_blueprint_property(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: DefaultPropertyParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let property = required("property_name", &p.property_name)?;
    editor.set_blueprint_default(blueprint, property, p.property_value)?;
    Ok(json!({
        "blueprint_name": blueprint,
        "property_name": property,
        "success": true,
    }))
}

fn set_static_mesh_properties(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: StaticMeshParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let component = required("component_name", &p.component_name)?;
    let mesh = asset_path("static_mesh", &p.static_mesh)?;
    if editor.find_asset(&mesh).is_none() {
        return Err(BridgeError::NotFound(format!(
            "Asset not found: {}",
            p.static_mesh
        )));
    }
    let material = match p.material.as_deref().filter(|m| !m.trim().is_empty()) {
        Some(raw) => {
            let path = asset_path("material", raw)?;
            if editor.find_asset(&path).is_none() {
                return Err(BridgeError::NotFound(format!("Asset not found: {}", raw)));
            }
            Some(path.object_path())
        }
        None => None,
    };

    editor.set_component_property(blueprint, component, "StaticMesh", json!(mesh.object_path()))?;
    if let Some(material) = &material {
        editor.set_component_property(blueprint, component, "Material", json!(material))?;
    }
    Ok(json!({
        "blueprint_name": blueprint,
        "component_name": component,
        "static_mesh": mesh.object_path(),
        "material": material,
    }))
}

fn set_pawn_properties(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: PawnParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let info = require_blueprint(editor, blueprint)?;
    if !info.is_pawn() {
        return Err(BridgeError::OperationFailed(format!(
            "Blueprint '{}' is not a Pawn (parent class {})",
            info.name, info.parent_class
        )));
    }

    // (parameter, class default property, value)
    let updates = [
        (
            "auto_possess_player",
            "AutoPossessPlayer",
            p.auto_possess_player.map(Value::from),
        ),
        (
            "use_controller_rotation_yaw",
            "bUseControllerRotationYaw",
            p.use_controller_rotation_yaw.map(Value::from),
        ),
        (
            "use_controller_rotation_pitch",
            "bUseControllerRotationPitch",
            p.use_controller_rotation_pitch.map(Value::from),
        ),
        (
            "use_controller_rotation_roll",
            "bUseControllerRotationRoll",
            p.use_controller_rotation_roll.map(Value::from),
        ),
        ("can_be_damaged", "bCanBeDamaged", p.can_be_damaged.map(Value::from)),
    ];
    let mut results = Map::new();
    for (param, property, value) in updates {
        if let Some(value) = value {
            editor.set_blueprint_default(blueprint, property, value.clone())?;
            results.insert(param.to_string(), json!({ "success": true, "value": value }));
        }
    }
    if results.is_empty() {
        return Err(BridgeError::InvalidParameters(
            "no pawn properties were provided".to_string(),
        ));
    }
    Ok(json!({
        "blueprint": info.name,
        "success": true,
        "results": results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests_support::{call, call_err};
    use unreal_editor_sim::SimulatedEditor;
    use unreal_mcp_core::BlueprintEditor;

    fn with_blueprint(parent: &str) -> SimulatedEditor {
        let mut editor = SimulatedEditor::new();
        call(
            &mut editor,
            create_blueprint,
            json!({"name": "BP_Test", "parent_class": parent}),
        );
        editor
    }

    #[test]
    fn test_create_blueprint() {
        let mut editor = SimulatedEditor::new();
        let created = call(
            &mut editor,
            create_blueprint,
            json!({"name": "BP_Hero", "parent_class": "ACharacter"}),
        );
        assert_eq!(
            created,
            json!({"name": "BP_Hero", "path": "/Game/Blueprints/BP_Hero", "parent_class": "Character"})
        );

        let fallback = call(
            &mut editor,
            create_blueprint,
            json!({"name": "BP_Thing", "parent_class": "NotAClass"}),
        );
        assert_eq!(fallback["parent_class"], json!("Actor"));

        assert_eq!(
            call_err(&mut editor, create_blueprint, json!({"name": "BP_Hero"})),
            "Blueprint already exists: BP_Hero"
        );
    }

    #[test]
    fn test_components_and_physics() {
        let mut editor = with_blueprint("Actor");
        let added = call(
            &mut editor,
            add_component_to_blueprint,
            json!({"blueprint_name": "BP_Test", "component_type": "StaticMesh", "component_name": "Body"}),
        );
        assert_eq!(added["component_type"], json!("StaticMeshComponent"));
        call(
            &mut editor,
            add_component_to_blueprint,
            json!({"blueprint_path": "BP_Test", "component_type": "PointLightComponent", "component_name": "Glow"}),
        );

        let physics = call(
            &mut editor,
            set_physics_properties,
            json!({"blueprint_name": "BP_Test", "component_name": "Body", "mass": 20.0}),
        );
        assert_eq!(physics["simulate_physics"], json!(true));
        assert_eq!(physics["mass"], json!(20.0));

        assert_eq!(
            call_err(
                &mut editor,
                set_physics_properties,
                json!({"blueprint_name": "BP_Test", "component_name": "Glow"})
            ),
            "Component 'Glow' is a PointLightComponent, not a primitive component"
        );
        assert_eq!(
            call_err(
                &mut editor,
                set_physics_properties,
                json!({"blueprint_name": "BP_Test", "component_name": "Body", "mass": -1})
            ),
            "Invalid mass parameter: must be a non-negative number"
        );
    }

    #[test]
    fn test_static_mesh_and_compile() {
        let mut editor = with_blueprint("Actor");
        call(
            &mut editor,
            add_component_to_blueprint,
            json!({"blueprint_name": "BP_Test", "component_type": "StaticMeshComponent", "component_name": "Mesh"}),
        );
        let mesh = call(
            &mut editor,
            set_static_mesh_properties,
            json!({
                "blueprint_name": "BP_Test",
                "component_name": "Mesh",
                "static_mesh": "/Engine/BasicShapes/Cube",
                "material": "/Engine/BasicShapes/BasicShapeMaterial"
            }),
        );
        assert_eq!(mesh["static_mesh"], json!("/Engine/BasicShapes/Cube.Cube"));
        assert_eq!(
            call_err(
                &mut editor,
                set_static_mesh_properties,
                json!({"blueprint_name": "BP_Test", "component_name": "Mesh", "static_mesh": "/Game/NoMesh"})
            ),
            "Asset not found: /Game/NoMesh"
        );

        let compiled = call(&mut editor, compile_blueprint, json!({"blueprint_name": "BP_Test"}));
        assert_eq!(
            compiled,
            json!({"name": "BP_Test", "compiled": true, "status": "UpToDate"})
        );
        assert_eq!(
            call_err(&mut editor, compile_blueprint, json!({"blueprint_name": "BP_Nope"})),
            "Blueprint not found: BP_Nope"
        );
    }

    #[test]
    fn test_pawn_properties() {
        let mut editor = with_blueprint("Pawn");
        let result = call(
            &mut editor,
            set_pawn_properties,
            json!({"blueprint_name": "BP_Test", "auto_possess_player": "Player0", "can_be_damaged": false}),
        );
        assert_eq!(result["success"], json!(true));
        assert_eq!(result["results"]["auto_possess_player"]["value"], json!("Player0"));
        assert!(result["results"].get("use_controller_rotation_yaw").is_none());

        let mut actor_editor = with_blueprint("Actor");
        let err = call_err(
            &mut actor_editor,
            set_pawn_properties,
            json!({"blueprint_name": "BP_Test", "can_be_damaged": true}),
        );
        assert_eq!(err, "Blueprint 'BP_Test' is not a Pawn (parent class Actor)");
    }

    #[test]
    fn test_blueprint_default() {
        let mut editor = with_blueprint("Actor");
        call(
            &mut editor,
            set_blueprint_property,
            json!({"blueprint_name": "BP_Test", "property_name": "bReplicates", "property_value": true}),
        );
        let info = editor.find_blueprint("BP_Test").unwrap();
        assert_eq!(info.defaults["bReplicates"], json!(true));
    }
}
