//! Blueprint classes and their event graphs

use crate::SimulatedEditor;
use crate::assets::StoredAsset;
use serde_json::{Map, Value};
use tracing::debug;
use unreal_mcp_core::{
    AssetPath, BlueprintEditor, BlueprintInfo, BridgeError, CompileStatus, ComponentInfo,
    GraphNode, NodeKind, PinDirection, Result, VariableSpec,
};
use uuid::Uuid;

/// A link from an output pin to an input pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PinLink {
    pub source_node: String,
    pub source_pin: String,
    pub target_node: String,
    pub target_pin: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SimBlueprint {
    pub info: BlueprintInfo,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<PinLink>,
}

impl SimBlueprint {
    fn node(&self, id: &str) -> Result<&GraphNode> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| BridgeError::NotFound(format!("Node not found: {}", id)))
    }
}

/// Engine-style GUID: 32 uppercase hex digits
pub(crate) fn new_guid() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

impl SimulatedEditor {
    fn blueprint_key(&self, blueprint: &str) -> Option<String> {
        if self.blueprints.contains_key(blueprint) {
            return Some(blueprint.to_string());
        }
        if let Ok(path) = AssetPath::parse(blueprint) {
            if self.blueprints.contains_key(path.package_name()) {
                return Some(path.package_name().to_string());
            }
        }
        self.blueprints
            .iter()
            .find(|(_, bp)| bp.info.name.eq_ignore_ascii_case(blueprint))
            .map(|(key, _)| key.clone())
    }

    fn blueprint_mut(&mut self, blueprint: &str) -> Result<(String, &mut SimBlueprint)> {
        let not_found = || BridgeError::NotFound(format!("Blueprint not found: {}", blueprint));
        let key = self.blueprint_key(blueprint).ok_or_else(not_found)?;
        let bp = self.blueprints.get_mut(&key).ok_or_else(not_found)?;
        Ok((key, bp))
    }

    /// Apply `edit` to a Blueprint. Only a successful edit dirties the
    /// package and invalidates the last compile; `edit` must validate before
    /// it mutates.
    fn edit_blueprint<T>(
        &mut self,
        blueprint: &str,
        edit: impl FnOnce(&mut SimBlueprint) -> Result<T>,
    ) -> Result<T> {
        let (key, bp) = self.blueprint_mut(blueprint)?;
        let out = edit(bp)?;
        bp.info.compiled = false;
        if let Some(asset) = self.assets.get_mut(&key) {
            asset.dirty = true;
        }
        Ok(out)
    }

    fn add_blueprint_dependency(&mut self, blueprint: &str, package: &str) {
        if let Some(key) = self.blueprint_key(blueprint) {
            if let Some(asset) = self.assets.get_mut(&key) {
                asset.dependencies.insert(package.to_string());
            }
        }
    }
}

impl BlueprintEditor for SimulatedEditor {
    fn find_blueprint(&self, blueprint: &str) -> Option<BlueprintInfo> {
        let key = self.blueprint_key(blueprint)?;
        self.blueprints.get(&key).map(|bp| bp.info.clone())
    }

    fn create_blueprint(
        &mut self,
        name: &str,
        package_path: &str,
        parent_class: &str,
    ) -> Result<BlueprintInfo> {
        let raw = format!("{}/{}", package_path.trim_end_matches('/'), name);
        let path = AssetPath::parse(&raw).map_err(|e| BridgeError::invalid("path", e.to_string()))?;
        if self.stored(&path).is_some() || self.blueprint_key(name).is_some() {
            return Err(BridgeError::AlreadyExists(format!(
                "Blueprint already exists: {}",
                name
            )));
        }

        let info = BlueprintInfo {
            name: path.asset_name().to_string(),
            path: path.package_name().to_string(),
            parent_class: parent_class.to_string(),
            components: Vec::new(),
            variables: Vec::new(),
            defaults: Map::new(),
            compiled: false,
        };
        let mut asset = StoredAsset::new(&path, "Blueprint")
            .with_tag("ParentClass", &format!("/Script/Engine.{}", parent_class));
        asset.dirty = true;
        self.insert_asset(asset);
        self.blueprints.insert(
            info.path.clone(),
            SimBlueprint {
                info: info.clone(),
                nodes: Vec::new(),
                links: Vec::new(),
            },
        );
        debug!("Created Blueprint {} ({})", info.path, parent_class);
        Ok(info)
    }

    fn add_component(&mut self, blueprint: &str, component: ComponentInfo) -> Result<()> {
        self.edit_blueprint(blueprint, |bp| {
            if bp.info.component(&component.name).is_some() {
                return Err(BridgeError::AlreadyExists(format!(
                    "Component '{}' already exists in Blueprint '{}'",
                    component.name, bp.info.name
                )));
            }
            bp.info.components.push(component);
            Ok(())
        })
    }

    fn set_component_property(
        &mut self,
        blueprint: &str,
        component: &str,
        property: &str,
        value: Value,
    ) -> Result<()> {
        let asset_ref = value
            .as_str()
            .and_then(|s| AssetPath::parse(s).ok())
            .map(|p| p.package_name().to_string());

        self.edit_blueprint(blueprint, |bp| {
            let comp = bp
                .info
                .components
                .iter_mut()
                .find(|c| c.name == component)
                .ok_or_else(|| BridgeError::NotFound(format!("Component not found: {}", component)))?;
            comp.properties.insert(property.to_string(), value);
            Ok(())
        })?;

        if let Some(package) = asset_ref {
            self.add_blueprint_dependency(blueprint, &package);
        }
        Ok(())
    }

    fn set_blueprint_default(&mut self, blueprint: &str, property: &str, value: Value) -> Result<()> {
        self.edit_blueprint(blueprint, |bp| {
            bp.info.defaults.insert(property.to_string(), value);
            Ok(())
        })
    }

    fn compile_blueprint(&mut self, blueprint: &str) -> Result<CompileStatus> {
        let (key, bp) = self.blueprint_mut(blueprint)?;
        bp.info.compiled = true;
        debug!("Compiled Blueprint {}", bp.info.path);
        if let Some(asset) = self.assets.get_mut(&key) {
            asset.dirty = true;
        }
        Ok(CompileStatus::UpToDate)
    }

    fn graph_nodes(&self, blueprint: &str) -> Vec<GraphNode> {
        self.blueprint_key(blueprint)
            .and_then(|key| self.blueprints.get(&key))
            .map(|bp| bp.nodes.clone())
            .unwrap_or_default()
    }

    fn add_graph_node(
        &mut self,
        blueprint: &str,
        kind: NodeKind,
        position: [f64; 2],
    ) -> Result<GraphNode> {
        self.edit_blueprint(blueprint, |bp| {
            let node = GraphNode {
                id: new_guid(),
                pins: kind.pins(),
                kind,
                position,
            };
            bp.nodes.push(node.clone());
            Ok(node)
        })
    }

    fn connect_pins(
        &mut self,
        blueprint: &str,
        source: (&str, &str),
        target: (&str, &str),
    ) -> Result<()> {
        self.edit_blueprint(blueprint, |bp| connect(bp, source, target))
    }

    fn add_variable(&mut self, blueprint: &str, variable: VariableSpec) -> Result<()> {
        self.edit_blueprint(blueprint, |bp| {
            if bp.info.variables.iter().any(|v| v.name == variable.name) {
                return Err(BridgeError::AlreadyExists(format!(
                    "Variable '{}' already exists in Blueprint '{}'",
                    variable.name, bp.info.name
                )));
            }
            bp.info.variables.push(variable);
            Ok(())
        })
    }
}

/// Link an output pin to an input pin; repeating a link is a no-op
fn connect(bp: &mut SimBlueprint, source: (&str, &str), target: (&str, &str)) -> Result<()> {
    for ((node_id, pin_name), direction) in [
        (source, PinDirection::Output),
        (target, PinDirection::Input),
    ] {
        let node = bp.node(node_id)?;
        match node.pin(pin_name) {
            Some(pin) if pin.direction == direction => {}
            Some(_) => {
                return Err(BridgeError::OperationFailed(format!(
                    "Pin '{}' on node {} has the wrong direction",
                    pin_name, node_id
                )));
            }
            None => {
                return Err(BridgeError::NotFound(format!(
                    "Pin '{}' not found on node {}",
                    pin_name, node_id
                )));
            }
        }
    }

    let link = PinLink {
        source_node: source.0.to_string(),
        source_pin: source.1.to_string(),
        target_node: target.0.to_string(),
        target_pin: target.1.to_string(),
    };
    if !bp.links.contains(&link) {
        bp.links.push(link);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unreal_mcp_core::{AssetRegistry, AssetTools, Transform};

    fn editor_with_bp() -> SimulatedEditor {
        let mut editor = SimulatedEditor::new();
        editor
            .create_blueprint("BP_Door", "/Game/Blueprints", "Actor")
            .unwrap();
        editor
    }

    fn mesh_component(name: &str) -> ComponentInfo {
        ComponentInfo {
            name: name.into(),
            component_type: "StaticMeshComponent".into(),
            transform: Transform::default(),
            properties: Map::new(),
        }
    }

    #[test]
    fn test_lookup_by_name_or_path() {
        let editor = editor_with_bp();
        assert!(editor.find_blueprint("BP_Door").is_some());
        assert!(editor.find_blueprint("bp_door").is_some());
        assert!(editor.find_blueprint("/Game/Blueprints/BP_Door").is_some());
        assert!(editor.find_blueprint("/Game/Blueprints/BP_Door.BP_Door").is_some());
        assert!(editor.find_blueprint("BP_Window").is_none());
    }

    #[test]
    fn test_create_registers_asset() {
        let mut editor = editor_with_bp();
        let path = AssetPath::parse("/Game/Blueprints/BP_Door").unwrap();
        assert_eq!(editor.find_asset(&path).unwrap().class, "Blueprint");
        let err = editor
            .create_blueprint("BP_Door", "/Game/Other", "Actor")
            .unwrap_err();
        assert_eq!(err.to_string(), "Blueprint already exists: BP_Door");
    }

    #[test]
    fn test_components_and_compile_state() {
        let mut editor = editor_with_bp();
        editor.add_component("BP_Door", mesh_component("Mesh")).unwrap();
        assert!(editor.add_component("BP_Door", mesh_component("Mesh")).is_err());
        editor
            .set_component_property("BP_Door", "Mesh", "StaticMesh", json!("/Engine/BasicShapes/Cube"))
            .unwrap();
        assert!(!editor.find_blueprint("BP_Door").unwrap().compiled);

        editor.compile_blueprint("BP_Door").unwrap();
        assert!(editor.find_blueprint("BP_Door").unwrap().compiled);

        let path = AssetPath::parse("/Game/Blueprints/BP_Door").unwrap();
        assert_eq!(editor.dependencies(&path), vec!["/Engine/BasicShapes/Cube".to_string()]);
    }

    #[test]
    fn test_failed_edit_keeps_compile_state() {
        let mut editor = editor_with_bp();
        editor.add_component("BP_Door", mesh_component("Mesh")).unwrap();
        editor.compile_blueprint("BP_Door").unwrap();
        let path = AssetPath::parse("/Game/Blueprints/BP_Door").unwrap();
        editor.save_asset(&path, false);

        let err = editor
            .set_component_property("BP_Door", "Nope", "Mobility", json!("Movable"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Component not found: Nope");
        assert!(editor.add_component("BP_Door", mesh_component("Mesh")).is_err());
        assert!(editor.connect_pins("BP_Door", ("missing", "then"), ("other", "execute")).is_err());

        assert!(editor.find_blueprint("BP_Door").unwrap().compiled);
        assert!(!editor.assets["/Game/Blueprints/BP_Door"].dirty);
    }

    #[test]
    fn test_connect_pins() {
        let mut editor = editor_with_bp();
        let event = editor
            .add_graph_node(
                "BP_Door",
                NodeKind::Event {
                    event_name: "ReceiveBeginPlay".into(),
                },
                [0.0, 0.0],
            )
            .unwrap();
        let call = editor
            .add_graph_node(
                "BP_Door",
                NodeKind::Function {
                    target: None,
                    function_name: "PrintString".into(),
                },
                [300.0, 0.0],
            )
            .unwrap();
        assert_eq!(event.id.len(), 32);
        assert_ne!(event.id, call.id);

        editor
            .connect_pins("BP_Door", (&event.id, "then"), (&call.id, "execute"))
            .unwrap();
        assert!(
            editor
                .connect_pins("BP_Door", (&call.id, "execute"), (&event.id, "then"))
                .is_err()
        );
        assert!(
            editor
                .connect_pins("BP_Door", (&event.id, "nope"), (&call.id, "execute"))
                .is_err()
        );
    }

    #[test]
    fn test_rename_moves_blueprint() {
        use unreal_mcp_core::AssetTools;
        let mut editor = editor_with_bp();
        let from = AssetPath::parse("/Game/Blueprints/BP_Door").unwrap();
        let to = AssetPath::parse("/Game/Blueprints/BP_Gate").unwrap();
        assert!(editor.rename_asset(&from, &to));
        assert!(editor.find_blueprint("BP_Door").is_none());
        assert_eq!(
            editor.find_blueprint("BP_Gate").unwrap().path,
            "/Game/Blueprints/BP_Gate"
        );
    }
}
