//! Blueprint, component and graph-node descriptors

use crate::math::Transform;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Parent classes that make a Blueprint a Pawn
const PAWN_CLASSES: &[&str] = &[
    "Pawn",
    "Character",
    "DefaultPawn",
    "SpectatorPawn",
    "WheeledVehiclePawn",
];

/// Component classes that carry collision and physics state
const PRIMITIVE_COMPONENTS: &[&str] = &[
    "StaticMeshComponent",
    "SkeletalMeshComponent",
    "BoxComponent",
    "SphereComponent",
    "CapsuleComponent",
    "ShapeComponent",
];

pub fn is_pawn_class(class: &str) -> bool {
    let class = class.trim_start_matches('A');
    PAWN_CLASSES.iter().any(|c| c.eq_ignore_ascii_case(class))
}

pub fn is_primitive_component(component_type: &str) -> bool {
    PRIMITIVE_COMPONENTS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(component_type))
}

/// A component in a Blueprint's construction script
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentInfo {
    pub name: String,
    pub component_type: String,
    pub transform: Transform,
    pub properties: Map<String, Value>,
}

/// A Blueprint class asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlueprintInfo {
    pub name: String,
    /// Package path, e.g. `/Game/Blueprints/BP_Door`
    pub path: String,
    pub parent_class: String,
    pub components: Vec<ComponentInfo>,
    pub variables: Vec<VariableSpec>,
    pub defaults: Map<String, Value>,
    pub compiled: bool,
}

impl BlueprintInfo {
    pub fn component(&self, name: &str) -> Option<&ComponentInfo> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn is_pawn(&self) -> bool {
        is_pawn_class(&self.parent_class)
    }

    /// Generated class name used when spawning instances
    pub fn generated_class(&self) -> String {
        format!("{}_C", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    UpToDate,
    Warning,
    Error,
}

impl fmt::Display for CompileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompileStatus::UpToDate => "UpToDate",
            CompileStatus::Warning => "UpToDateWithWarnings",
            CompileStatus::Error => "Error",
        };
        f.write_str(s)
    }
}

/// Pin direction on a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pin {
    pub name: String,
    pub direction: PinDirection,
}

impl Pin {
    fn input(name: &str) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Input,
        }
    }

    fn output(name: &str) -> Self {
        Self {
            name: name.to_string(),
            direction: PinDirection::Output,
        }
    }
}

/// What a graph node does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node_type")]
pub enum NodeKind {
    Event {
        event_name: String,
    },
    InputAction {
        action_name: String,
    },
    Function {
        target: Option<String>,
        function_name: String,
    },
    ComponentReference {
        component_name: String,
    },
    SelfReference,
}

impl NodeKind {
    /// Name used by `find_blueprint_nodes`
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Event { .. } => "Event",
            NodeKind::InputAction { .. } => "InputAction",
            NodeKind::Function { .. } => "Function",
            NodeKind::ComponentReference { .. } => "Variable",
            NodeKind::SelfReference => "Self",
        }
    }

    /// Default pin layout for a freshly placed node
    pub fn pins(&self) -> Vec<Pin> {
        match self {
            NodeKind::Event { event_name } => {
                let mut pins = vec![Pin::output("then")];
                if event_name == "ReceiveTick" {
                    pins.push(Pin::output("DeltaSeconds"));
                }
                pins
            }
            NodeKind::InputAction { .. } => vec![Pin::output("Pressed"), Pin::output("Released")],
            NodeKind::Function { .. } => vec![
                Pin::input("execute"),
                Pin::input("self"),
                Pin::output("then"),
                Pin::output("ReturnValue"),
            ],
            NodeKind::ComponentReference { component_name } => vec![Pin::output(component_name)],
            NodeKind::SelfReference => vec![Pin::output("self")],
        }
    }
}

/// A node in a Blueprint's event graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// 32-character uppercase hex GUID
    pub id: String,
    #[serde(flatten)]
    pub kind: NodeKind,
    pub position: [f64; 2],
    pub pins: Vec<Pin>,
}

impl GraphNode {
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.name == name)
    }
}

/// Member variable types the bridge can create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariableType {
    Boolean,
    Integer,
    Float,
    String,
    Name,
    Text,
    Vector,
    Rotator,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for VariableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ty = match s.trim().to_ascii_lowercase().as_str() {
            "boolean" | "bool" => VariableType::Boolean,
            "integer" | "int" | "int32" => VariableType::Integer,
            "float" | "double" | "real" => VariableType::Float,
            "string" | "str" => VariableType::String,
            "name" => VariableType::Name,
            "text" => VariableType::Text,
            "vector" => VariableType::Vector,
            "rotator" => VariableType::Rotator,
            _ => return Err(format!("unsupported variable type '{s}'")),
        };
        Ok(ty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSpec {
    pub name: String,
    pub variable_type: VariableType,
    pub is_exposed: bool,
    pub default_value: Option<Value>,
}
