//! In-memory Unreal Editor
//!
//! `SimulatedEditor` implements every editor port against plain data
//! structures so the bridge can run without an engine process. It keeps
//! descriptors only: no meshes, heightmaps or compiled bytecode.

mod assets;
mod blueprint;
mod landscape;
mod level;
mod project;
mod umg;

use std::collections::BTreeMap;
use unreal_mcp_core::{AssetPath, InputActionMapping, Rotator, Vector3, WidgetBlueprintInfo};

use assets::StoredAsset;
use blueprint::SimBlueprint;
use landscape::SimLandscape;
use level::{SimActor, SimWorld};

/// Package of the level open at startup
pub const DEFAULT_MAP: &str = "/Game/Maps/Main";

const BASIC_SHAPES: &[&str] = &["Cube", "Sphere", "Cylinder", "Plane", "Cone"];
const BASIC_SHAPE_MATERIAL: &str = "/Engine/BasicShapes/BasicShapeMaterial";

/// Camera state of the active level viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCamera {
    pub location: Vector3,
    pub rotation: Rotator,
}

/// In-memory editor state
pub struct SimulatedEditor {
    /// Registry keyed by package name
    pub(crate) assets: BTreeMap<String, StoredAsset>,
    pub(crate) world: Option<SimWorld>,
    /// Actors last saved for each level package
    pub(crate) saved_levels: BTreeMap<String, Vec<SimActor>>,
    /// Landscapes last saved for each level package
    pub(crate) saved_landscapes: BTreeMap<String, Vec<SimLandscape>>,
    /// Blueprints keyed by package name
    pub(crate) blueprints: BTreeMap<String, SimBlueprint>,
    /// Widget Blueprints keyed by package name
    pub(crate) widgets: BTreeMap<String, WidgetBlueprintInfo>,
    pub(crate) action_mappings: Vec<InputActionMapping>,
    pub(crate) camera: ViewportCamera,
}

impl Default for SimulatedEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEditor {
    /// Editor with engine content and the default map open
    pub fn new() -> Self {
        let mut editor = Self::empty();
        editor.seed_engine_content();

        let actors = level::default_actors();
        editor.register_level(DEFAULT_MAP, &actors);
        editor.saved_levels.insert(DEFAULT_MAP.to_string(), actors.clone());
        editor.world = Some(SimWorld::open(DEFAULT_MAP, actors, Vec::new()));
        editor
    }

    /// Editor with engine content but no world loaded
    pub fn without_world() -> Self {
        let mut editor = Self::empty();
        editor.seed_engine_content();
        editor
    }

    fn empty() -> Self {
        Self {
            assets: BTreeMap::new(),
            world: None,
            saved_levels: BTreeMap::new(),
            saved_landscapes: BTreeMap::new(),
            blueprints: BTreeMap::new(),
            widgets: BTreeMap::new(),
            action_mappings: Vec::new(),
            camera: ViewportCamera {
                location: Vector3::new(-1000.0, 0.0, 500.0),
                rotation: Rotator::new(-20.0, 0.0, 0.0),
            },
        }
    }

    fn seed_engine_content(&mut self) {
        if let Ok(material) = AssetPath::parse(BASIC_SHAPE_MATERIAL) {
            let asset = StoredAsset::new(&material, "Material").with_tag("MaterialDomain", "MD_Surface");
            self.insert_asset(asset);
        }
        for shape in BASIC_SHAPES {
            let Ok(path) = AssetPath::parse(&format!("/Engine/BasicShapes/{shape}")) else {
                continue;
            };
            let asset = StoredAsset::new(&path, "StaticMesh")
                .with_tag("LODs", "1")
                .with_tag("CollisionPrims", "1")
                .with_dependency(BASIC_SHAPE_MATERIAL);
            self.insert_asset(asset);
        }
    }

    pub fn viewport_camera(&self) -> ViewportCamera {
        self.camera
    }

    /// Number of assets in the registry
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unreal_mcp_core::{AssetFilter, AssetRegistry, LevelEditor};

    #[test]
    fn test_seeded_shapes() {
        let editor = SimulatedEditor::new();
        let shapes = editor.query_assets(&AssetFilter {
            package_path: Some("/Engine/BasicShapes".into()),
            class_name: Some("StaticMesh".into()),
            recursive: false,
        });
        let names: Vec<&str> = shapes.iter().map(|a| a.name.as_str()).collect();
        for shape in BASIC_SHAPES {
            assert!(names.contains(shape), "missing {shape}");
        }
    }

    #[test]
    fn test_default_world() {
        let editor = SimulatedEditor::new();
        let world = editor.current_world().unwrap();
        assert_eq!(world.world_name, "Main");
        assert!(world.persistent_level.num_actors > 0);
        assert!(SimulatedEditor::without_world().current_world().is_none());
    }
}
