//! Editor world: levels, streaming levels, actors and the viewport

use crate::SimulatedEditor;
use crate::landscape::SimLandscape;
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::debug;
use unreal_mcp_core::{
    ActorEditor, ActorInfo, ActorSpawn, AssetPath, BoundingBox, BridgeError, LevelEditor,
    LevelSnapshot, Result, Rotator, StreamingLevelInfo, Transform, TransformUpdate, Vector3,
    WorldSnapshot, WorldType, world::streaming_level_matches,
};

/// Half-size of the basic shapes, in centimetres
const SHAPE_HALF_EXTENT: f64 = 50.0;

/// 1x1 transparent PNG written in place of a real capture
const PLACEHOLDER_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// An actor and its editable properties
#[derive(Debug, Clone)]
pub(crate) struct SimActor {
    pub info: ActorInfo,
    pub properties: Map<String, Value>,
}

impl SimActor {
    pub fn new(name: &str, class: &str, transform: Transform) -> Self {
        Self {
            info: ActorInfo {
                name: name.to_string(),
                class: class.to_string(),
                location: transform.location,
                rotation: transform.rotation,
                scale: transform.scale,
            },
            properties: default_properties(class),
        }
    }

    /// Package of the mesh this actor renders, if any
    pub fn static_mesh(&self) -> Option<String> {
        let mesh = self.properties.get("StaticMesh")?.as_str()?;
        AssetPath::parse(mesh).ok().map(|p| p.package_name().to_string())
    }

    fn bounds(&self) -> Option<BoundingBox> {
        let has_geometry = self.static_mesh().is_some() || self.info.class.ends_with("_C");
        has_geometry.then(|| {
            let s = self.info.scale;
            BoundingBox::around(
                self.info.location,
                Vector3::new(
                    SHAPE_HALF_EXTENT * s.x.abs(),
                    SHAPE_HALF_EXTENT * s.y.abs(),
                    SHAPE_HALF_EXTENT * s.z.abs(),
                ),
            )
        })
    }
}

fn default_properties(class: &str) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("bHidden".into(), json!(false));
    props.insert("Tags".into(), json!([]));
    let mobility = match class {
        "StaticMeshActor" | "DirectionalLight" => "Static",
        _ => "Movable",
    };
    props.insert("Mobility".into(), json!(mobility));
    match class {
        "StaticMeshActor" => {
            props.insert("StaticMesh".into(), Value::Null);
            props.insert("Material".into(), Value::Null);
        }
        "PointLight" | "SpotLight" => {
            props.insert("Intensity".into(), json!(5000.0));
            props.insert("LightColor".into(), json!([255, 255, 255]));
            props.insert("AttenuationRadius".into(), json!(1000.0));
        }
        "DirectionalLight" => {
            props.insert("Intensity".into(), json!(10.0));
            props.insert("LightColor".into(), json!([255, 255, 255]));
        }
        "CameraActor" => {
            props.insert("FieldOfView".into(), json!(90.0));
        }
        _ => {}
    }
    props
}

/// Contents of a freshly created default map
pub(crate) fn default_actors() -> Vec<SimActor> {
    let mut floor = SimActor::new(
        "Floor",
        "StaticMeshActor",
        Transform {
            scale: Vector3::new(20.0, 20.0, 0.1),
            ..Transform::default()
        },
    );
    floor
        .properties
        .insert("StaticMesh".into(), json!("/Engine/BasicShapes/Plane"));
    let sun = SimActor::new(
        "DirectionalLight",
        "DirectionalLight",
        Transform {
            location: Vector3::new(0.0, 0.0, 1000.0),
            rotation: Rotator::new(-45.0, 30.0, 0.0),
            ..Transform::default()
        },
    );
    vec![floor, sun]
}

fn same_kind(current: &Value, new: &Value) -> bool {
    match current {
        Value::Null => new.is_null() || new.is_string(),
        Value::Bool(_) => new.is_boolean(),
        Value::Number(_) => new.is_number(),
        Value::String(_) => new.is_string(),
        Value::Array(_) => new.is_array(),
        Value::Object(_) => new.is_object(),
    }
}

/// The world open in the editor
#[derive(Debug, Clone)]
pub(crate) struct SimWorld {
    pub map_name: String,
    pub package_name: String,
    pub world_type: WorldType,
    pub actors: Vec<SimActor>,
    pub landscapes: Vec<SimLandscape>,
    pub streaming: Vec<StreamingLevelInfo>,
}

impl SimWorld {
    pub fn open(package_name: &str, actors: Vec<SimActor>, landscapes: Vec<SimLandscape>) -> Self {
        let mut world = Self {
            map_name: String::new(),
            package_name: String::new(),
            world_type: WorldType::Editor,
            actors,
            landscapes,
            streaming: Vec::new(),
        };
        world.rename(package_name);
        world
    }

    pub fn rename(&mut self, package_name: &str) {
        self.package_name = package_name.to_string();
        self.map_name = package_name.rsplit('/').next().unwrap_or(package_name).to_string();
    }

    pub fn actor(&self, name: &str) -> Option<&SimActor> {
        self.actors.iter().find(|a| a.info.name == name)
    }

    fn actor_mut(&mut self, name: &str) -> Option<&mut SimActor> {
        self.actors.iter_mut().find(|a| a.info.name == name)
    }

    fn streaming_mut(&mut self, name: &str) -> Result<&mut StreamingLevelInfo> {
        self.streaming
            .iter_mut()
            .find(|l| streaming_level_matches(&l.package_name, name))
            .ok_or_else(|| BridgeError::NotFound(format!("Streaming level not found: {}", name)))
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let actor_bounds = self
            .actors
            .iter()
            .filter_map(SimActor::bounds)
            .chain(self.landscapes.iter().map(SimLandscape::bounds))
            .collect();
        WorldSnapshot {
            world_name: self.map_name.clone(),
            world_type: self.world_type,
            persistent_level: LevelSnapshot {
                name: self.map_name.clone(),
                package_name: self.package_name.clone(),
                is_visible: true,
                num_actors: self.actors.len() + self.landscapes.len(),
                actor_bounds,
            },
            streaming_levels: self.streaming.clone(),
        }
    }
}

impl SimulatedEditor {
    pub(crate) fn world_mut(&mut self) -> Result<&mut SimWorld> {
        self.world.as_mut().ok_or(BridgeError::NoActiveWorld)
    }

    fn require_level_asset(&self, package_name: &str) -> Result<()> {
        let is_level = AssetPath::parse(package_name)
            .ok()
            .and_then(|p| self.stored(&p))
            .is_some_and(|a| a.data.class == "World");
        if is_level {
            Ok(())
        } else {
            Err(BridgeError::NotFound(format!("Level not found: {}", package_name)))
        }
    }
}

impl LevelEditor for SimulatedEditor {
    fn current_world(&self) -> Option<WorldSnapshot> {
        self.world.as_ref().map(SimWorld::snapshot)
    }

    fn new_level(&mut self, package_name: &str) -> Result<LevelSnapshot> {
        let path = AssetPath::parse(package_name)
            .map_err(|e| BridgeError::invalid("level_path", e.to_string()))?;
        if self.stored(&path).is_some() {
            return Err(BridgeError::AlreadyExists(format!(
                "Level already exists: {}",
                package_name
            )));
        }
        self.register_level(package_name, &[]);
        self.saved_levels.insert(package_name.to_string(), Vec::new());
        let world = SimWorld::open(package_name, Vec::new(), Vec::new());
        let level = world.snapshot().persistent_level;
        self.world = Some(world);
        debug!("Created level {}", package_name);
        Ok(level)
    }

    fn save_current_level(&mut self) -> Result<String> {
        let world = self.world.as_ref().ok_or(BridgeError::NoActiveWorld)?;
        let (package, map_name) = (world.package_name.clone(), world.map_name.clone());
        let actors = world.actors.clone();
        let landscapes = world.landscapes.clone();

        self.register_level(&package, &actors);
        self.saved_levels.insert(package.clone(), actors);
        self.saved_landscapes.insert(package.clone(), landscapes);
        debug!("Saved level {}", package);
        Ok(map_name)
    }

    fn open_level(&mut self, package_name: &str) -> Result<()> {
        self.require_level_asset(package_name)?;
        let path = AssetPath::parse(package_name)
            .map_err(|e| BridgeError::invalid("level_path", e.to_string()))?;
        let package = path.package_name();
        let actors = self.saved_levels.get(package).cloned().unwrap_or_default();
        let landscapes = self.saved_landscapes.get(package).cloned().unwrap_or_default();
        self.world = Some(SimWorld::open(package, actors, landscapes));
        debug!("Opened level {}", package);
        Ok(())
    }

    fn add_streaming_level(&mut self, package_name: &str) -> Result<()> {
        self.require_level_asset(package_name)?;
        let world = self.world_mut()?;
        if world.package_name == package_name {
            return Err(BridgeError::OperationFailed(format!(
                "Cannot stream {} into itself",
                package_name
            )));
        }
        if world.streaming.iter().any(|l| l.package_name == package_name) {
            return Err(BridgeError::AlreadyExists(format!(
                "Streaming level already exists: {}",
                package_name
            )));
        }
        world.streaming.push(StreamingLevelInfo {
            package_name: package_name.to_string(),
            is_loaded: true,
            is_visible: true,
        });
        Ok(())
    }

    fn set_streaming_level_loaded(&mut self, name: &str, loaded: bool) -> Result<()> {
        let level = self.world_mut()?.streaming_mut(name)?;
        level.is_loaded = loaded;
        if !loaded {
            level.is_visible = false;
        }
        Ok(())
    }

    fn set_streaming_level_visible(&mut self, name: &str, visible: bool) -> Result<()> {
        let level = self.world_mut()?.streaming_mut(name)?;
        if visible {
            level.is_loaded = true;
        }
        level.is_visible = visible;
        Ok(())
    }
}

impl ActorEditor for SimulatedEditor {
    fn level_actors(&self) -> Vec<ActorInfo> {
        self.world
            .as_ref()
            .map(|w| w.actors.iter().map(|a| a.info.clone()).collect())
            .unwrap_or_default()
    }

    fn spawn_actor(&mut self, spawn: ActorSpawn) -> Result<ActorInfo> {
        let world = self.world_mut()?;
        if world.actor(&spawn.name).is_some() {
            return Err(BridgeError::AlreadyExists(format!(
                "Actor with name '{}' already exists",
                spawn.name
            )));
        }
        let actor = SimActor::new(&spawn.name, &spawn.class, spawn.transform);
        let info = actor.info.clone();
        world.actors.push(actor);
        debug!("Spawned {} ({})", info.name, info.class);
        Ok(info)
    }

    fn destroy_actor(&mut self, name: &str) -> Option<ActorInfo> {
        let world = self.world.as_mut()?;
        let idx = world.actors.iter().position(|a| a.info.name == name)?;
        Some(world.actors.remove(idx).info)
    }

    fn set_actor_transform(&mut self, name: &str, update: TransformUpdate) -> Option<ActorInfo> {
        let actor = self.world.as_mut()?.actor_mut(name)?;
        let mut transform = actor.info.transform();
        update.apply(&mut transform);
        actor.info.location = transform.location;
        actor.info.rotation = transform.rotation;
        actor.info.scale = transform.scale;
        Some(actor.info.clone())
    }

    fn actor_properties(&self, name: &str) -> Option<Map<String, Value>> {
        self.world.as_ref()?.actor(name).map(|a| a.properties.clone())
    }

    fn set_actor_property(&mut self, name: &str, property: &str, value: Value) -> Result<()> {
        let actor = self
            .world_mut()?
            .actor_mut(name)
            .ok_or_else(|| BridgeError::NotFound(format!("Actor not found: {}", name)))?;
        let Some(current) = actor.properties.get(property) else {
            return Err(BridgeError::OperationFailed(format!(
                "Property '{}' not found on actor '{}'",
                property, name
            )));
        };
        if !same_kind(current, &value) {
            return Err(BridgeError::invalid(
                "property_value",
                format!("type does not match property '{}'", property),
            ));
        }
        actor.properties.insert(property.to_string(), value);
        Ok(())
    }

    fn focus_viewport(&mut self, location: Vector3, distance: f64, orientation: Option<Rotator>) {
        let rotation = orientation.unwrap_or(self.camera.rotation);
        let (pitch, yaw) = (rotation.pitch.to_radians(), rotation.yaw.to_radians());
        let forward = Vector3::new(pitch.cos() * yaw.cos(), pitch.cos() * yaw.sin(), pitch.sin());
        self.camera.location = Vector3::new(
            location.x - forward.x * distance,
            location.y - forward.y * distance,
            location.z - forward.z * distance,
        );
        self.camera.rotation = rotation;
    }

    fn take_screenshot(&mut self, path: &Path) -> Result<()> {
        if self.world.is_none() {
            return Err(BridgeError::NoActiveWorld);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, PLACEHOLDER_PNG)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unreal_mcp_core::AssetRegistry;

    fn spawn(name: &str, class: &str) -> ActorSpawn {
        ActorSpawn {
            name: name.into(),
            class: class.into(),
            transform: Transform::default(),
        }
    }

    #[test]
    fn test_level_round_trip() {
        let mut editor = SimulatedEditor::new();
        editor.new_level("/Game/TestLevel").unwrap();
        editor.spawn_actor(spawn("Lamp", "PointLight")).unwrap();
        assert_eq!(editor.save_current_level().unwrap(), "TestLevel");

        editor.open_level(crate::DEFAULT_MAP).unwrap();
        assert!(editor.actor_properties("Lamp").is_none());

        editor.open_level("/Game/TestLevel").unwrap();
        let world = editor.current_world().unwrap();
        assert_eq!(world.persistent_level.name, "TestLevel");
        assert_eq!(world.persistent_level.num_actors, 1);
    }

    #[test]
    fn test_unsaved_changes_are_discarded() {
        let mut editor = SimulatedEditor::new();
        editor.spawn_actor(spawn("Temp", "CameraActor")).unwrap();
        editor.open_level(crate::DEFAULT_MAP).unwrap();
        assert!(editor.level_actors().iter().all(|a| a.name != "Temp"));
    }

    #[test]
    fn test_duplicate_level_and_actor() {
        let mut editor = SimulatedEditor::new();
        let err = editor.new_level(crate::DEFAULT_MAP).unwrap_err();
        assert!(matches!(err, BridgeError::AlreadyExists(_)));

        editor.spawn_actor(spawn("A", "PointLight")).unwrap();
        let err = editor.spawn_actor(spawn("A", "SpotLight")).unwrap_err();
        assert_eq!(err.to_string(), "Actor with name 'A' already exists");
    }

    #[test]
    fn test_streaming_levels() {
        let mut editor = SimulatedEditor::new();
        editor.new_level("/Game/Sub").unwrap();
        editor.open_level(crate::DEFAULT_MAP).unwrap();
        editor.add_streaming_level("/Game/Sub").unwrap();
        editor.set_streaming_level_loaded("Sub", false).unwrap();

        let world = editor.current_world().unwrap();
        let sub = world.streaming_level("Sub").unwrap();
        assert!(!sub.is_loaded && !sub.is_visible);
        assert_eq!(world.num_levels(), 1);

        editor.set_streaming_level_visible("Sub", true).unwrap();
        assert_eq!(editor.current_world().unwrap().num_levels(), 2);

        let err = editor.set_streaming_level_visible("Nope", true).unwrap_err();
        assert_eq!(err.to_string(), "Streaming level not found: Nope");
    }

    #[test]
    fn test_actor_property_types() {
        let mut editor = SimulatedEditor::new();
        editor.spawn_actor(spawn("Lamp", "PointLight")).unwrap();
        editor
            .set_actor_property("Lamp", "Intensity", json!(200.0))
            .unwrap();
        assert!(
            editor
                .set_actor_property("Lamp", "Intensity", json!("bright"))
                .is_err()
        );
        assert!(editor.set_actor_property("Lamp", "Wattage", json!(1)).is_err());
    }

    #[test]
    fn test_saved_level_tracks_mesh_dependencies() {
        let mut editor = SimulatedEditor::new();
        editor.save_current_level().unwrap();
        let main = AssetPath::parse(crate::DEFAULT_MAP).unwrap();
        assert!(
            editor
                .dependencies(&main)
                .contains(&"/Engine/BasicShapes/Plane".to_string())
        );
    }

    #[test]
    fn test_screenshot_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("shots/frame.png");
        let mut editor = SimulatedEditor::new();
        editor.take_screenshot(&file).unwrap();
        assert!(std::fs::read(&file).unwrap().starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_no_world() {
        let mut editor = SimulatedEditor::without_world();
        assert!(editor.level_actors().is_empty());
        assert!(matches!(
            editor.spawn_actor(spawn("A", "PointLight")),
            Err(BridgeError::NoActiveWorld)
        ));
        assert!(matches!(
            editor.save_current_level(),
            Err(BridgeError::NoActiveWorld)
        ));
    }
}
