//! Event graph editing

use super::blueprint::require_blueprint;
use super::{parse, required};
use crate::router::Router;
use serde::Deserialize;
use serde_json::{Value, json};
use unreal_mcp_core::{BridgeError, Editor, NodeKind, Params, Result, VariableSpec, VariableType};

pub fn register(router: &mut Router) {
    router.register("connect_blueprint_nodes", connect_blueprint_nodes);
    router.register("add_blueprint_event_node", add_blueprint_event_node);
    router.register("add_blueprint_input_action_node", add_blueprint_input_action_node);
    router.register("add_blueprint_function_node", add_blueprint_function_node);
    router.register(
        "add_blueprint_get_self_component_reference",
        add_blueprint_component_reference,
    );
    router.register("add_blueprint_get_component_node", add_blueprint_component_reference);
    router.register("add_blueprint_self_reference", add_blueprint_self_reference);
    router.register("find_blueprint_nodes", find_blueprint_nodes);
    router.register("add_blueprint_variable", add_blueprint_variable);
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    source_node_id: String,
    source_pin: String,
    target_node_id: String,
    target_pin: String,
}

#[derive(Debug, Deserialize)]
struct EventParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    event_name: String,
    #[serde(default)]
    node_position: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct InputActionParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    action_name: String,
    #[serde(default)]
    node_position: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct FunctionParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    #[serde(default)]
    target: Option<String>,
    function_name: String,
    #[serde(default)]
    node_position: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct ComponentRefParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    component_name: String,
    #[serde(default)]
    node_position: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct SelfRefParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    #[serde(default)]
    node_position: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct FindParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    node_type: String,
    event_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VariableParams {
    #[serde(alias = "blueprint_path")]
    blueprint_name: String,
    variable_name: String,
    variable_type: String,
    #[serde(default)]
    is_exposed: bool,
    default_value: Option<Value>,
}

fn place_node(
    editor: &mut dyn Editor,
    blueprint: &str,
    kind: NodeKind,
    position: [f64; 2],
) -> Result<Value> {
    let node = editor.add_graph_node(blueprint, kind, position)?;
    Ok(json!({ "node_id": node.id }))
}

fn connect_blueprint_nodes(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ConnectParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let source = (
        required("source_node_id", &p.source_node_id)?,
        required("source_pin", &p.source_pin)?,
    );
    let target = (
        required("target_node_id", &p.target_node_id)?,
        required("target_pin", &p.target_pin)?,
    );
    editor.connect_pins(blueprint, source, target)?;
    Ok(json!({
        "source_node_id": source.0,
        "target_node_id": target.0,
    }))
}

fn add_blueprint_event_node(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: EventParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let event = required("event_name", &p.event_name)?;

    // An event fires once per graph; reuse the node if it is already placed
    let existing = editor.graph_nodes(blueprint).into_iter().find(|n| {
        matches!(&n.kind, NodeKind::Event { event_name } if event_name == event)
    });
    if let Some(node) = existing {
        return Ok(json!({ "node_id": node.id }));
    }
    place_node(
        editor,
        blueprint,
        NodeKind::Event {
            event_name: event.to_string(),
        },
        p.node_position,
    )
}

fn add_blueprint_input_action_node(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: InputActionParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let action = required("action_name", &p.action_name)?;
    place_node(
        editor,
        blueprint,
        NodeKind::InputAction {
            action_name: action.to_string(),
        },
        p.node_position,
    )
}

fn add_blueprint_function_node(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: FunctionParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let function = required("function_name", &p.function_name)?;
    let target = p
        .target
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    place_node(
        editor,
        blueprint,
        NodeKind::Function {
            target,
            function_name: function.to_string(),
        },
        p.node_position,
    )
}

fn add_blueprint_component_reference(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: ComponentRefParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let component = required("component_name", &p.component_name)?;
    let info = require_blueprint(editor, blueprint)?;
    if info.component(component).is_none() {
        return Err(BridgeError::NotFound(format!(
            "Component not found: {}",
            component
        )));
    }
    place_node(
        editor,
        blueprint,
        NodeKind::ComponentReference {
            component_name: component.to_string(),
        },
        p.node_position,
    )
}

fn add_blueprint_self_reference(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: SelfRefParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    place_node(editor, blueprint, NodeKind::SelfReference, p.node_position)
}

fn find_blueprint_nodes(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: FindParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let node_type = required("node_type", &p.node_type)?;
    let event = p.event_name.as_deref().map(str::trim).filter(|e| !e.is_empty());
    require_blueprint(editor, blueprint)?;

    let guids: Vec<String> = editor
        .graph_nodes(blueprint)
        .into_iter()
        .filter(|n| n.kind.type_name().eq_ignore_ascii_case(node_type))
        .filter(|n| match (&n.kind, event) {
            (NodeKind::Event { event_name }, Some(wanted)) => event_name == wanted,
            _ => true,
        })
        .map(|n| n.id)
        .collect();
    Ok(json!({ "node_guids": guids }))
}

fn add_blueprint_variable(editor: &mut dyn Editor, params: Params) -> Result<Value> {
    let p: VariableParams = parse(params)?;
    let blueprint = required("blueprint_name", &p.blueprint_name)?;
    let name = required("variable_name", &p.variable_name)?;
    let variable_type: VariableType = p
        .variable_type
        .parse()
        .map_err(|reason: String| BridgeError::invalid("variable_type", reason))?;

    editor.add_variable(
        blueprint,
        VariableSpec {
            name: name.to_string(),
            variable_type,
            is_exposed: p.is_exposed,
            default_value: p.default_value,
        },
    )?;
    Ok(json!({
        "variable_name": name,
        "variable_type": variable_type.to_string(),
    }))
}
