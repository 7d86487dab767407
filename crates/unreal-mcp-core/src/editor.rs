//! Editor ports
//!
//! Each trait covers one editor subsystem. Command handlers only ever see
//! `&mut dyn Editor`; a live engine binding and the in-memory simulator both
//! implement these traits. Every method is called on the game thread.

use crate::asset::{AssetData, AssetFilter, AssetPath};
use crate::blueprint::{BlueprintInfo, CompileStatus, ComponentInfo, GraphNode, NodeKind, VariableSpec};
use crate::error::Result;
use crate::math::{Rotator, Vector3};
use crate::umg::{EventBinding, InputActionMapping, TextBinding, WidgetBlueprintInfo, WidgetElement};
use crate::world::{
    ActorInfo, ActorSpawn, LandscapeInfo, LandscapeModification, LandscapeSettings, LevelSnapshot,
    TransformUpdate, WorldSnapshot,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Asset lifecycle operations (load, save, copy, import, export)
pub trait AssetTools {
    fn load_asset(&mut self, path: &AssetPath) -> Option<AssetData>;

    /// Returns `false` when the package could not be written
    fn save_asset(&mut self, path: &AssetPath, only_if_dirty: bool) -> bool;

    fn duplicate_asset(&mut self, source: &AssetPath, destination: &AssetPath) -> Option<AssetData>;

    fn delete_asset(&mut self, path: &AssetPath) -> bool;

    /// Rename or move; fixes up referencers
    fn rename_asset(&mut self, source: &AssetPath, destination: &AssetPath) -> bool;

    /// Import a file on disk into `destination` (a content directory)
    fn import_asset(&mut self, file: &Path, destination: &str) -> Vec<AssetData>;

    fn export_asset(&mut self, path: &AssetPath, destination: &Path) -> bool;
}

/// Read-only view of the asset registry
pub trait AssetRegistry {
    fn find_asset(&self, path: &AssetPath) -> Option<AssetData>;

    fn query_assets(&self, filter: &AssetFilter) -> Vec<AssetData>;

    fn asset_tags(&self, path: &AssetPath) -> BTreeMap<String, String>;

    /// Package names that reference `path`
    fn referencers(&self, path: &AssetPath) -> Vec<String>;

    /// Package names that `path` depends on
    fn dependencies(&self, path: &AssetPath) -> Vec<String>;
}

/// Level and world management
pub trait LevelEditor {
    /// `None` when the editor has no world
    fn current_world(&self) -> Option<WorldSnapshot>;

    /// Create and open a new persistent level saved at `package_name`
    fn new_level(&mut self, package_name: &str) -> Result<LevelSnapshot>;

    /// Returns the map name
    fn save_current_level(&mut self) -> Result<String>;

    fn open_level(&mut self, package_name: &str) -> Result<()>;

    fn add_streaming_level(&mut self, package_name: &str) -> Result<()>;

    fn set_streaming_level_loaded(&mut self, name: &str, loaded: bool) -> Result<()>;

    fn set_streaming_level_visible(&mut self, name: &str, visible: bool) -> Result<()>;
}

/// Actors in the current level and the active viewport
pub trait ActorEditor {
    fn level_actors(&self) -> Vec<ActorInfo>;

    fn spawn_actor(&mut self, spawn: ActorSpawn) -> Result<ActorInfo>;

    /// Returns the actor as it was before destruction
    fn destroy_actor(&mut self, name: &str) -> Option<ActorInfo>;

    fn set_actor_transform(&mut self, name: &str, update: TransformUpdate) -> Option<ActorInfo>;

    fn actor_properties(&self, name: &str) -> Option<Map<String, Value>>;

    fn set_actor_property(&mut self, name: &str, property: &str, value: Value) -> Result<()>;

    fn focus_viewport(&mut self, location: Vector3, distance: f64, orientation: Option<Rotator>);

    fn take_screenshot(&mut self, path: &Path) -> Result<()>;
}

/// Landscape actors. Terrain generation lives entirely behind this trait.
pub trait LandscapeEditor {
    fn landscapes(&self) -> Vec<LandscapeInfo>;

    fn create_landscape(&mut self, settings: &LandscapeSettings) -> Result<LandscapeInfo>;

    fn sculpt_landscape(&mut self, name: &str, modification: LandscapeModification) -> Result<()>;

    fn paint_landscape_layer(&mut self, name: &str, layer: &str) -> Result<()>;
}

/// Blueprint classes, components and event graphs.
///
/// `blueprint` arguments accept either the asset name or its package path.
pub trait BlueprintEditor {
    fn find_blueprint(&self, blueprint: &str) -> Option<BlueprintInfo>;

    fn create_blueprint(
        &mut self,
        name: &str,
        package_path: &str,
        parent_class: &str,
    ) -> Result<BlueprintInfo>;

    fn add_component(&mut self, blueprint: &str, component: ComponentInfo) -> Result<()>;

    fn set_component_property(
        &mut self,
        blueprint: &str,
        component: &str,
        property: &str,
        value: Value,
    ) -> Result<()>;

    /// Set a property on the class default object
    fn set_blueprint_default(&mut self, blueprint: &str, property: &str, value: Value) -> Result<()>;

    fn compile_blueprint(&mut self, blueprint: &str) -> Result<CompileStatus>;

    fn graph_nodes(&self, blueprint: &str) -> Vec<GraphNode>;

    fn add_graph_node(
        &mut self,
        blueprint: &str,
        kind: NodeKind,
        position: [f64; 2],
    ) -> Result<GraphNode>;

    /// Link an output pin to an input pin, as `(node_id, pin_name)` pairs
    fn connect_pins(
        &mut self,
        blueprint: &str,
        source: (&str, &str),
        target: (&str, &str),
    ) -> Result<()>;

    fn add_variable(&mut self, blueprint: &str, variable: VariableSpec) -> Result<()>;
}

/// UMG widget Blueprints
pub trait WidgetEditor {
    fn find_widget_blueprint(&self, widget: &str) -> Option<WidgetBlueprintInfo>;

    fn create_widget_blueprint(
        &mut self,
        name: &str,
        package_path: &str,
        parent_class: &str,
    ) -> Result<WidgetBlueprintInfo>;

    fn add_widget_element(&mut self, widget: &str, element: WidgetElement) -> Result<()>;

    fn bind_widget_event(&mut self, widget: &str, binding: EventBinding) -> Result<()>;

    fn bind_widget_text(&mut self, widget: &str, binding: TextBinding) -> Result<()>;
}

/// Project-wide settings
pub trait ProjectSettings {
    fn action_mappings(&self) -> Vec<InputActionMapping>;

    fn add_action_mapping(&mut self, mapping: InputActionMapping) -> Result<()>;
}

/// Everything a command handler can reach
pub trait Editor:
    AssetTools
    + AssetRegistry
    + LevelEditor
    + ActorEditor
    + LandscapeEditor
    + BlueprintEditor
    + WidgetEditor
    + ProjectSettings
{
}

impl<T> Editor for T where
    T: AssetTools
        + AssetRegistry
        + LevelEditor
        + ActorEditor
        + LandscapeEditor
        + BlueprintEditor
        + WidgetEditor
        + ProjectSettings
{
}
